use criterion::{black_box, criterion_group, criterion_main, Criterion};

use coursecraft_core::parser::{extract_json_from_markdown, parse_course_str, validate_course};

fn bench_extract_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json");

    let fenced = "Here is your course:\n\n```json\n{\"title\": \"T\", \"lessons\": []}\n```\n";
    let generic = "```\n{\"title\": \"T\", \"lessons\": []}\n```";
    let raw = "{\"title\": \"T\", \"lessons\": []}";

    group.bench_function("json_fence", |b| {
        b.iter(|| extract_json_from_markdown(black_box(fenced)))
    });

    group.bench_function("generic_fence", |b| {
        b.iter(|| extract_json_from_markdown(black_box(generic)))
    });

    group.bench_function("raw", |b| {
        b.iter(|| extract_json_from_markdown(black_box(raw)))
    });

    group.finish();
}

fn bench_course_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("course_parsing");

    let small = generate_course_json(3);
    let medium = generate_course_json(20);
    let large = generate_course_json(200);

    group.bench_function("3_lessons", |b| {
        b.iter(|| parse_course_str(black_box(&small)))
    });

    group.bench_function("20_lessons", |b| {
        b.iter(|| parse_course_str(black_box(&medium)))
    });

    group.bench_function("200_lessons", |b| {
        b.iter(|| parse_course_str(black_box(&large)))
    });

    if let Ok(course) = parse_course_str(&large) {
        group.bench_function("validate_200_lessons", |b| {
            b.iter(|| validate_course(black_box(&course)))
        });
    }

    group.finish();
}

/// A course cycling through the three exercise kinds.
fn generate_course_json(n: usize) -> String {
    let lessons: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            let mut lesson = serde_json::json!({
                "title": format!("Lesson {i}"),
                "content": format!("Content for lesson {i}, explained simply."),
            });
            match i % 3 {
                0 => {
                    lesson["quiz"] = serde_json::json!({
                        "question": format!("Question {i}?"),
                        "options": ["A", "B", "C", "D"],
                        "correctAnswer": "B"
                    });
                }
                1 => {
                    lesson["fillInTheBlank"] = serde_json::json!({
                        "sentence": format!("Lesson {i} is about ___."),
                        "correctAnswer": "energy"
                    });
                }
                _ => {
                    lesson["scrambledSentence"] = serde_json::json!({
                        "scrambled": ["light", "Plants", "use"],
                        "correctSentence": "Plants use light"
                    });
                }
            }
            lesson
        })
        .collect();
    format!(
        "```json\n{}\n```",
        serde_json::json!({ "title": "Benchmark Course", "lessons": lessons })
    )
}

criterion_group!(benches, bench_extract_json, bench_course_parsing);
criterion_main!(benches);
