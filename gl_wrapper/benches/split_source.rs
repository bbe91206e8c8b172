use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gl_wrapper::shader_source::split_source;

fn combined_source(lines: usize) -> String {
    let mut src = String::from("#shader vertex\n#version 330 core\n");
    for i in 0..lines {
        src.push_str(&format!("    float v{i} = {i}.0;\n"));
    }
    src.push_str("#shader fragment\n#version 330 core\n");
    for i in 0..lines {
        src.push_str(&format!("    float f{i} = {i}.0;\n"));
    }
    src
}

pub fn split_benchmark(c: &mut Criterion) {
    let src = combined_source(1000);

    c.bench_function("split 2000 lines", |b| {
        b.iter(|| split_source(black_box(src.as_bytes())).unwrap())
    });
}

criterion_group!(benches, split_benchmark);
criterion_main!(benches);
