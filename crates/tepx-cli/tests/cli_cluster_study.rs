use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use tepx_io::{ClusterTable, write_cluster_parquet};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cluster_study"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    p.push(format!("tepx-cluster-study-{}-{}-{}", name, std::process::id(), nanos));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn study_renders_maps_and_skips_missing_pileups() {
    let root = tmp_dir("study");
    let input = root.join("in");
    let out = root.join("out");
    std::fs::create_dir_all(&input).unwrap();
    let table = ClusterTable::from_positions(
        vec![7.0, 11.5, 15.0, 19.0, 23.0, 7.0],
        vec![0.0; 6],
        vec![175.0, 201.0, 231.0, 265.0, -265.0, 190.0],
    )
    .unwrap();
    write_cluster_parquet(&table, &input.join("Cluster_100.parquet"), "Clu").unwrap();
    let cfg = root.join("study.yaml");
    std::fs::write(&cfg, "report:\n  format: svg\n").unwrap();

    let o = run(&[
        "--config",
        cfg.to_str().unwrap(),
        "--out-dir",
        out.to_str().unwrap(),
        input.to_str().unwrap(),
        "--pileup",
        "100",
        "--pileup",
        "200",
    ]);
    assert!(o.status.success(), "stderr={}", String::from_utf8_lossy(&o.stderr));

    let v: serde_json::Value = serde_json::from_slice(&o.stdout).expect("stdout should be JSON");
    assert_eq!(v["images"], 5);
    assert_eq!(v["skipped"].as_array().unwrap().len(), 1);

    for name in [
        "radialDist-perRing_PU100",
        "radialDist-perDisk_PU100",
        "ZvsR_PU100",
        "ZvsR_PU100_Pos",
        "ZvsR_PU100_D4",
    ] {
        assert!(out.join(format!("{name}.svg")).is_file(), "missing {name}");
    }
    let counts = tepx_io::ResultsFile::read(&out.join("Results_ClusterStudy.json")).unwrap();
    assert_eq!(counts.get("Clusters_PU100").and_then(|v| v.as_u64()), Some(6));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn inverted_range_is_rejected_at_startup() {
    let root = tmp_dir("badrange");
    let cfg = root.join("study.yaml");
    std::fs::write(&cfg, "clusters:\n  z_range_positive: [300.0, 0.0]\n").unwrap();
    let o = run(&[
        "--config",
        cfg.to_str().unwrap(),
        "--out-dir",
        root.join("out").to_str().unwrap(),
        root.to_str().unwrap(),
    ]);
    assert!(!o.status.success());
    assert!(String::from_utf8_lossy(&o.stderr).contains("z_range_positive"));
    assert!(!root.join("out").join("Results_ClusterStudy.json").exists());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn failing_study_is_skipped_and_counts_are_written() {
    let root = tmp_dir("inner");
    let table = ClusterTable::from_positions(vec![7.0], vec![0.0], vec![175.0]).unwrap();
    write_cluster_parquet(&table, &root.join("Cluster_100.parquet"), "Clu").unwrap();
    // The default sub-disk table does not validate, so the inner-disk study fails.
    let cfg = root.join("study.yaml");
    std::fs::write(&cfg, "clusters:\n  inner_disks: true\nreport:\n  format: svg\n").unwrap();
    let out = root.join("out");

    let o = run(&[
        "--config",
        cfg.to_str().unwrap(),
        "--out-dir",
        out.to_str().unwrap(),
        root.to_str().unwrap(),
    ]);
    assert!(o.status.success(), "stderr={}", String::from_utf8_lossy(&o.stderr));
    let v: serde_json::Value = serde_json::from_slice(&o.stdout).unwrap();
    assert_eq!(v["images"], 0);
    assert_eq!(v["skipped"].as_array().unwrap().len(), 1);
    assert!(out.join("Results_ClusterStudy.json").is_file());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn path_is_required() {
    let o = run(&[]);
    assert!(!o.status.success());
    assert!(String::from_utf8_lossy(&o.stderr).contains("Usage"));
}
