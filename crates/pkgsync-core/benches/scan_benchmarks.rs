use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pkgsync_core::diff::push_diff;
use pkgsync_core::scan::{FileSetScanner, Filters};
use pkgsync_core::state::SyncSnapshot;
use std::fs;
use tempfile::tempdir;

fn populate(root: &std::path::Path, dirs: usize, files_per_dir: usize) {
    for d in 0..dirs {
        let dir = root.join(format!("dir{d}"));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..files_per_dir {
            fs::write(dir.join(format!("file{f}.json")), "{}").unwrap();
        }
    }
    fs::create_dir_all(root.join(".git/objects")).unwrap();
    for f in 0..200 {
        fs::write(root.join(format!(".git/objects/{f}")), "").unwrap();
    }
}

fn scan_benchmark(c: &mut Criterion) {
    c.bench_function("scan::FileSetScanner::scan (1000 files)", |b| {
        let dir = tempdir().unwrap();
        populate(dir.path(), 20, 50);
        let scanner =
            FileSetScanner::new(&Filters::new(["*.json"], ["*.log"], [".git"])).unwrap();

        b.iter(|| {
            let set = scanner.scan(black_box(dir.path())).unwrap();
            assert_eq!(set.len(), 1000);
        })
    });
}

fn push_diff_benchmark(c: &mut Criterion) {
    c.bench_function("diff::push_diff (1000 files, in sync)", |b| {
        let local = tempdir().unwrap();
        let remote = tempdir().unwrap();
        populate(local.path(), 20, 50);
        populate(remote.path(), 20, 50);
        let scanner = FileSetScanner::new(&Filters::new(["*"], ["*.log"], [".git"])).unwrap();
        let local_set = scanner.scan(local.path()).unwrap();
        let remote_set = scanner.scan(remote.path()).unwrap();
        let last = SyncSnapshot::from_file_set(&local_set);

        b.iter(|| {
            let actions = push_diff(black_box(&local_set), black_box(&remote_set), &last);
            black_box(actions);
        })
    });
}

criterion_group!(benches, scan_benchmark, push_diff_benchmark);
criterion_main!(benches);
