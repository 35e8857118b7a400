use super::*;

#[test]
fn normalize_path_cross_platform() {
    assert_eq!(normalize_rel_path("a/b.webp").unwrap(), "a/b.webp");
    assert_eq!(normalize_rel_path("a\\b.webp").unwrap(), "a/b.webp");
    assert_eq!(normalize_rel_path("./frame_0001.webp").unwrap(), "frame_0001.webp");
    assert!(normalize_rel_path("../x.webp").is_err());
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn memory_source_serves_known_names_only() {
    let src = MemorySource::new().with("frame_0001.webp", vec![1, 2, 3]);
    assert_eq!(src.len(), 1);
    assert_eq!(src.fetch("frame_0001.webp").unwrap(), vec![1, 2, 3]);
    let err = src.fetch("frame_0002.webp").unwrap_err();
    assert!(err.to_string().contains("load error:"));
}

#[test]
fn dir_source_reads_relative_to_root() {
    let tmp = std::env::temp_dir().join(format!("scrollreel_dir_source_{}", std::process::id()));
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("frame_0001.webp"), b"abc").unwrap();

    let src = DirSource::new(&tmp);
    assert_eq!(src.root(), tmp.as_path());
    assert_eq!(src.fetch("frame_0001.webp").unwrap(), b"abc".to_vec());
    assert!(matches!(
        src.fetch("frame_0002.webp"),
        Err(ReelError::Load(_))
    ));
    assert!(matches!(
        src.fetch("../frame_0001.webp"),
        Err(ReelError::Validation(_))
    ));

    std::fs::remove_dir_all(&tmp).ok();
}
