use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lettura_core::model::Language;
use lettura_core::sampler::{tokenize, VocabularySampler};

const PARAGRAPH: &str = "Il consiglio comunale, riunito ieri sera in seduta straordinaria, \
    ha approvato il nuovo piano per la mobilità urbana. Secondo l'assessore, \
    le prime piste ciclabili saranno pronte entro l'estate! Chi pagherà i lavori? \
    La regione coprirà metà della spesa, il resto arriverà dal bilancio cittadino. ";

fn bench_sampling(c: &mut Criterion) {
    let text = PARAGRAPH.repeat(12);
    let sampler = VocabularySampler::new(Language::Italian);

    c.bench_function("tokenize_article", |b| b.iter(|| tokenize(black_box(&text))));
    c.bench_function("eligible_words_article", |b| {
        b.iter(|| sampler.eligible_words(black_box(&text)))
    });
    c.bench_function("sample_10_words", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| sampler.sample_with_rng(black_box(&text), 10, &mut rng))
    });
}

criterion_group!(benches, bench_sampling);
criterion_main!(benches);
