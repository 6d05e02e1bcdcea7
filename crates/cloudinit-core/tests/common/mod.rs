use cloudinit_core::{KeyRef, SourceKind, StaticLookup};

/// Lookup snapshot shared by the integration tests
#[allow(dead_code)]
pub fn fixture_lookup() -> StaticLookup {
    StaticLookup::new()
        .with_object(
            SourceKind::ConfigObject,
            "default",
            "base-config",
            [
                ("cloud-init", "#cloud-config\npackages:\n  - htop\n"),
                ("users", "#cloud-config\nusers:\n  - name: ops\n"),
            ],
        )
        .with_object(
            SourceKind::SecretObject,
            "default",
            "bootstrap",
            [("cloud-init", "#!/bin/sh\necho bootstrap\n")],
        )
}

#[allow(dead_code)]
pub fn config_ref(name: &str) -> KeyRef {
    KeyRef::new(SourceKind::ConfigObject, "default", name)
}

#[allow(dead_code)]
pub fn secret_ref(name: &str) -> KeyRef {
    KeyRef::new(SourceKind::SecretObject, "default", name)
}

/// Number of part sections in a plain-text document
#[allow(dead_code)]
pub fn count_sections(doc: &str, boundary: &str) -> usize {
    let delimiter = format!("--{}\r\n", boundary);
    doc.matches(&delimiter).count()
}
