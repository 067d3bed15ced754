use super::*;
use std::sync::Arc;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn temp_path_appends_part() {
    let p = temp_path(Path::new("file.png"));
    assert_eq!(p.to_string_lossy(), "file.png.part");
    let p2 = temp_path(Path::new("/tmp/clip.mp4"));
    assert_eq!(p2.to_string_lossy(), "/tmp/clip.mp4.part");
}

#[test]
fn disambiguated_names() {
    assert_eq!(disambiguated_name("a.png", 0), "a.png");
    assert_eq!(disambiguated_name("a.png", 1), "a_1.png");
    assert_eq!(disambiguated_name("a.b.png", 2), "a.b_2.png");
    assert_eq!(disambiguated_name("noext", 3), "noext_3");
}

#[test]
fn category_dirs_are_created_lazily() {
    let out = tempfile::tempdir().unwrap();
    let root = out.path().join("session");
    let sink = FilesystemSink::create(&root).unwrap();
    assert!(root.is_dir());
    for dir in ["images", "videos", "audio"] {
        assert!(!root.join(dir).exists(), "{dir} created too early");
    }

    let stored = sink
        .store(Category::Audio, &url("https://a.example/s/song.mp3"), b"ID3")
        .unwrap();
    assert_eq!(stored.relative_path, "audio/song.mp3");
    assert_eq!(stored.bytes, 3);
    assert_eq!(std::fs::read(root.join("audio/song.mp3")).unwrap(), b"ID3");
    assert!(!root.join("images").exists());
    assert!(!root.join("videos").exists());
}

#[test]
fn collisions_get_numeric_suffixes() {
    let out = tempfile::tempdir().unwrap();
    let sink = FilesystemSink::create(out.path()).unwrap();
    let a = sink
        .store(Category::Image, &url("https://a.example/x/logo.png"), b"first")
        .unwrap();
    let b = sink
        .store(Category::Image, &url("https://b.example/y/logo.png"), b"second")
        .unwrap();
    let c = sink
        .store(Category::Image, &url("https://c.example/logo.png?v=3"), b"third")
        .unwrap();
    assert_eq!(a.relative_path, "images/logo.png");
    assert_eq!(b.relative_path, "images/logo_1.png");
    assert_eq!(c.relative_path, "images/logo_2.png");
    assert_eq!(std::fs::read(&a.absolute_path).unwrap(), b"first");
    assert_eq!(std::fs::read(&b.absolute_path).unwrap(), b"second");
    assert_eq!(std::fs::read(&c.absolute_path).unwrap(), b"third");
}

#[test]
fn pre_existing_files_are_not_overwritten() {
    let out = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(out.path().join("videos")).unwrap();
    std::fs::write(out.path().join("videos/clip.mp4"), b"old").unwrap();
    std::fs::write(out.path().join("videos/clip_1.mp4.part"), b"stale").unwrap();
    let sink = FilesystemSink::create(out.path()).unwrap();
    let stored = sink
        .store(Category::Video, &url("https://a.example/clip.mp4"), b"new")
        .unwrap();
    assert_eq!(stored.relative_path, "videos/clip_2.mp4");
    assert_eq!(std::fs::read(out.path().join("videos/clip.mp4")).unwrap(), b"old");
}

#[test]
fn concurrent_stores_claim_distinct_names() {
    let out = tempfile::tempdir().unwrap();
    let sink = Arc::new(FilesystemSink::create(out.path()).unwrap());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let sink = Arc::clone(&sink);
            std::thread::spawn(move || {
                let u = url(&format!("https://h{i}.example/same.gif"));
                sink.store(Category::Image, &u, format!("body{i}").as_bytes())
                    .unwrap()
                    .relative_path
            })
        })
        .collect();
    let mut paths: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 8);
    let on_disk = std::fs::read_dir(out.path().join("images")).unwrap().count();
    assert_eq!(on_disk, 8);
}

#[test]
fn rejected_assets_are_refused() {
    let out = tempfile::tempdir().unwrap();
    let sink = FilesystemSink::create(out.path()).unwrap();
    assert!(sink
        .store(Category::Rejected, &url("https://a.example/x.css"), b"body")
        .is_err());
}

#[cfg(unix)]
#[test]
fn unwritable_category_dir_is_an_error() {
    use std::os::unix::fs::PermissionsExt;

    let out = tempfile::tempdir().unwrap();
    let sink = FilesystemSink::create(out.path()).unwrap();
    let images = out.path().join("images");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::set_permissions(&images, std::fs::Permissions::from_mode(0o500)).unwrap();
    // root ignores permission bits; only assert when the restriction is effective.
    let probe = std::fs::write(images.join("probe"), b"x");
    if probe.is_err() {
        let res = sink.store(Category::Image, &url("https://a.example/a.png"), b"x");
        assert!(res.is_err());
        assert!(!images.join("a.png").exists());
    }
    std::fs::set_permissions(&images, std::fs::Permissions::from_mode(0o700)).unwrap();
}

#[test]
fn create_fails_when_root_is_a_file() {
    let out = tempfile::tempdir().unwrap();
    let file = out.path().join("occupied");
    std::fs::write(&file, b"x").unwrap();
    assert!(FilesystemSink::create(&file.join("session")).is_err());
}
