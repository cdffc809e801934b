use super::{apply_explicit_override, classify, ArchiveFormat, AssetKind};

#[test]
fn classifies_tar_gz_and_tgz_as_archive() {
    assert_eq!(classify("tool-linux-amd64.tar.gz").archive_format, Some(ArchiveFormat::TarGz));
    assert_eq!(classify("tool-linux-amd64.tgz").archive_format, Some(ArchiveFormat::TarGz));
}

#[test]
fn longer_archive_suffix_wins_over_bare_tar() {
    let c = classify("tool.tar.bz2");
    assert_eq!(c.archive_format, Some(ArchiveFormat::TarBz2));
}

#[test]
fn classifies_deb_rpm_pkg_msi_as_package() {
    for name in ["tool.deb", "tool.rpm", "tool.pkg", "tool.msi"] {
        assert_eq!(classify(name).kind, AssetKind::Package, "{name}");
    }
}

#[test]
fn classifies_extensionless_names_as_raw_needing_chmod() {
    let c = classify("tool-linux-amd64");
    assert_eq!(c.kind, AssetKind::Raw);
    assert!(c.needs_chmod);
}

#[test]
fn classifies_shell_scripts_as_raw_needing_chmod() {
    let c = classify("install.sh");
    assert_eq!(c.kind, AssetKind::Raw);
    assert!(c.needs_chmod);
}

#[test]
fn classifies_windows_exe_as_raw_without_chmod() {
    let c = classify("tool-windows-amd64.exe");
    assert_eq!(c.kind, AssetKind::Raw);
    assert!(!c.needs_chmod);
}

#[test]
fn archive_invariant_kind_and_format_agree() {
    let c = classify("tool.zip");
    assert_eq!(c.kind, AssetKind::Archive);
    assert!(c.archive_format.is_some());

    let c = classify("tool");
    assert_eq!(c.kind, AssetKind::Raw);
    assert!(c.archive_format.is_none());
}

#[test]
fn explicit_override_changes_kind_but_not_archive_classification() {
    let base = classify("tool.zip");
    let overridden = apply_explicit_override(base, Some(AssetKind::Raw));
    assert_eq!(overridden.kind, AssetKind::Raw);
    assert!(overridden.archive_format.is_none());
}

#[test]
fn explicit_archive_override_keeps_the_filename_derived_classification() {
    let base = classify("tool.zip");
    let overridden = apply_explicit_override(base.clone(), Some(AssetKind::Archive));
    assert_eq!(overridden, base);
}

#[test]
fn no_override_leaves_classification_untouched() {
    let base = classify("tool.zip");
    let unchanged = apply_explicit_override(base.clone(), None);
    assert_eq!(unchanged, base);
}
