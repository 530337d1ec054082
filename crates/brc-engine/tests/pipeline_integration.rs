use brc_core::ParallelConfig;
use brc_engine::{process, run, EngineConfig, EngineError};
use rand::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const STATIONS: &[&str] = &[
    "Hamburg", "Berlin", "Oslo", "Tokyo", "Lima", "Accra", "Perth", "Nuuk",
    "São Paulo", "St. John's", "Ürümqi", "Las Palmas de Gran Canaria",
];

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

fn process_with(path: &PathBuf, workers: usize, chunk_size: usize) -> String {
    let config = EngineConfig::new(path).with_parallel(
        ParallelConfig::new()
            .with_workers(workers)
            .with_chunk_size(chunk_size),
    );
    process(&config).unwrap()
}

fn random_measurements(seed: u64, lines: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::new();
    for _ in 0..lines {
        let station = STATIONS[rng.gen_range(0..STATIONS.len())];
        let tenths: i32 = rng.gen_range(-999..=999);
        data.extend_from_slice(
            format!(
                "{};{}{}.{}\n",
                station,
                if tenths < 0 { "-" } else { "" },
                tenths.abs() / 10,
                tenths.abs() % 10
            )
            .as_bytes(),
        );
    }
    data
}

#[test]
fn sample_file_renders_sorted_summary() {
    let env = TestEnv::new();
    let path = env.write("sample.txt", b"Hamburg;12.0\nHamburg;8.0\nBerlin;5.0\n");

    let config = EngineConfig::new(&path);
    assert_eq!(
        process(&config).unwrap(),
        "{Berlin=5.0/5.0/5.0, Hamburg=8.0/10.0/12.0}"
    );
}

#[test]
fn negative_mean_rounds_half_away_from_zero() {
    let env = TestEnv::new();
    let path = env.write("oslo.txt", b"Oslo;-3.5\nOslo;-1.0\n");

    assert_eq!(
        process(&EngineConfig::new(&path)).unwrap(),
        "{Oslo=-3.5/-2.3/-1.0}"
    );
}

#[test]
fn single_record() {
    let env = TestEnv::new();
    let path = env.write("tokyo.txt", b"Tokyo;20.1\n");

    assert_eq!(
        process(&EngineConfig::new(&path)).unwrap(),
        "{Tokyo=20.1/20.1/20.1}"
    );
}

#[test]
fn empty_file_renders_empty_braces() {
    let env = TestEnv::new();
    let path = env.write("empty.txt", b"");

    let summary = run(&EngineConfig::new(&path)).unwrap();
    assert_eq!(summary.render(), "{}");
    assert_eq!(summary.records, 0);
    assert_eq!(summary.bytes_read, 0);
}

#[test]
fn file_of_only_malformed_records_renders_empty_braces() {
    let env = TestEnv::new();
    let path = env.write("junk.txt", b"Hamburg;hot\nno separator here\n;1.0\n");

    let summary = run(&EngineConfig::new(&path)).unwrap();
    assert_eq!(summary.render(), "{}");
    assert_eq!(summary.skipped, 3);
}

#[test]
fn malformed_records_are_skipped_without_aborting() {
    let env = TestEnv::new();
    let path = env.write(
        "mixed.txt",
        b"Hamburg;12.0\nHamburg;abc\nBerlin;5.0\nBerlin;1234.5\nHamburg;8.0\n",
    );

    let summary = run(&EngineConfig::new(&path).with_debug(true)).unwrap();
    assert_eq!(summary.render(), "{Berlin=5.0/5.0/5.0, Hamburg=8.0/10.0/12.0}");
    assert_eq!(summary.records, 3);
    assert_eq!(summary.skipped, 2);
}

#[test]
fn missing_trailing_newline_is_equivalent() {
    let env = TestEnv::new();
    let data = random_measurements(11, 500);
    let with_newline = env.write("with.txt", &data);
    let without_newline = env.write("without.txt", &data[..data.len() - 1]);

    for chunk_size in [1, 13, 64, 4096] {
        assert_eq!(
            process_with(&with_newline, 3, chunk_size),
            process_with(&without_newline, 3, chunk_size),
            "chunk_size {}",
            chunk_size
        );
    }
}

#[test]
fn output_is_independent_of_workers_and_chunking() {
    let env = TestEnv::new();
    let path = env.write("measurements.txt", &random_measurements(2024, 5_000));

    let baseline = process_with(&path, 1, 1024 * 1024);
    for workers in [1, 2, 3, 8] {
        for chunk_size in [1, 7, 100, 4096] {
            assert_eq!(
                process_with(&path, workers, chunk_size),
                baseline,
                "workers {} chunk_size {}",
                workers,
                chunk_size
            );
        }
    }
}

#[test]
fn summary_counters_add_up() {
    let env = TestEnv::new();
    let data = random_measurements(5, 2_000);
    let path = env.write("counted.txt", &data);

    let config = EngineConfig::new(&path).with_parallel(
        ParallelConfig::new()
            .with_workers(4)
            .with_queue_capacity(2)
            .with_chunk_size(512),
    );
    let summary = run(&config).unwrap();

    assert_eq!(summary.records, 2_000);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.bytes_read, data.len() as u64);
    assert_eq!(summary.table.observation_count(), 2_000);
    assert_eq!(summary.workers, 4);
    assert!(summary.chunks >= (data.len() / 512) as u64);
}

#[test]
fn missing_input_is_fatal() {
    let env = TestEnv::new();
    let config = EngineConfig::new(env.dir.path().join("absent.txt"));

    assert!(matches!(process(&config), Err(EngineError::Open { .. })));
}

#[test]
fn directory_input_is_fatal() {
    let env = TestEnv::new();
    let config = EngineConfig::new(env.dir.path());

    // Opening a directory succeeds on some platforms; reading it never does
    assert!(matches!(
        process(&config),
        Err(EngineError::Open { .. }) | Err(EngineError::Io(_))
    ));
}
