use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use djangogen::models::{EntityNames, FieldKind, FieldSpec};
use djangogen::patch::{apply_rules, entity_field_names, insert_into_entity, PatchRule};
use djangogen::templates::crud::model_block;

/// models.py with `count` models of five fields each
fn models_source(count: usize) -> String {
    let mut source = String::from("from django.db import models\n");
    for i in 0..count {
        let names = EntityNames::new(&format!("Model{}", i)).expect("valid name");
        let fields: Vec<FieldSpec> = (0..5)
            .map(|f| FieldSpec::new(&format!("field_{}", f), FieldKind::String { max_length: 100 }))
            .collect();
        source.push_str(&model_block(&names, &fields));
    }
    source
}

fn settings_rules() -> Vec<PatchRule> {
    vec![
        PatchRule::insert_after("INSTALLED_APPS = [", "    'blog',").unless_present("'blog'"),
        PatchRule::setting("MEDIA_URL", "'/uploads/'"),
        PatchRule::setting("MEDIA_ROOT", "BASE_DIR / 'uploads'"),
        PatchRule::replace("DEBUG = True", "DEBUG = os.environ.get('DEBUG') == '1'"),
    ]
}

fn bench_apply_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_rules");
    let rules = settings_rules();

    for padding in [10usize, 100, 1000] {
        let mut settings = String::from("DEBUG = True\n\nINSTALLED_APPS = [\n    'django.contrib.admin',\n]\n");
        for i in 0..padding {
            settings.push_str(&format!("SETTING_{} = {}\n", i, i));
        }
        let patched = apply_rules(&settings, &rules).document;

        group.bench_with_input(BenchmarkId::new("fresh", padding), &settings, |b, doc| {
            b.iter(|| apply_rules(black_box(doc), black_box(&rules)))
        });
        group.bench_with_input(BenchmarkId::new("already_applied", padding), &patched, |b, doc| {
            b.iter(|| apply_rules(black_box(doc), black_box(&rules)))
        });
    }
    group.finish();
}

fn bench_entity_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity");
    let members = vec!["    extra = models.TextField()".to_string()];

    for count in [10usize, 100] {
        let source = models_source(count);
        let last = format!("Model{}", count - 1);

        group.bench_with_input(BenchmarkId::new("insert_last", count), &source, |b, doc| {
            b.iter(|| insert_into_entity(black_box(doc), "class", &last, &members))
        });
        group.bench_with_input(BenchmarkId::new("field_names", count), &source, |b, doc| {
            b.iter(|| entity_field_names(black_box(doc), &last))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_apply_rules, bench_entity_edits);
criterion_main!(benches);
