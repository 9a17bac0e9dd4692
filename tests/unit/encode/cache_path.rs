use super::*;

fn split_name(name: &str) -> (Vec<&str>, &str) {
    let (stem, ext) = name.rsplit_once('.').unwrap();
    (stem.split('_').collect(), ext)
}

#[test]
fn print_text_names_have_no_timestamp() {
    let name = cache_file_name(OutputKind::PrintText, "png");
    let (parts, ext) = split_name(&name);
    assert_eq!(ext, "png");
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], "printText");
    assert!(uuid::Uuid::parse_str(parts[1]).is_ok());
}

#[test]
fn overlay_names_carry_millis() {
    let name = cache_file_name(OutputKind::Overlay, "jpg");
    let (parts, ext) = split_name(&name);
    assert_eq!(ext, "jpg");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "overlay");
    assert!(uuid::Uuid::parse_str(parts[1]).is_ok());
    assert!(parts[2].parse::<u128>().unwrap() > 1_600_000_000_000);
}

#[test]
fn generated_paths_are_unique() {
    let dir = Path::new("/tmp/cache");
    let a = generate_cache_path(dir, OutputKind::PrintText, "png");
    let b = generate_cache_path(dir, OutputKind::PrintText, "png");
    assert_ne!(a, b);
    assert_eq!(a.parent(), Some(dir));
}

#[test]
fn persist_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/out.png");
    persist(&path, b"abc").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"abc");
}
