use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RtConfig {
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// [routes] section: where links point when opened outside the viewer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Host serving `/{repo}/pulls/{n}/changes` pages, e.g. "https://git.example.com".
    /// That is the Harness Code route scheme; github.com uses `/pull/{n}/files`
    /// and will 404 on these links. Empty keeps links relative.
    #[serde(default)]
    pub base_url: String,
}

/// [clipboard] section. An empty command means auto-detect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_copy_icon")]
    pub copy_icon: String,
    #[serde(default = "default_true")]
    pub wrap_bodies: bool,
}

fn default_true() -> bool {
    true
}

fn default_copy_icon() -> String {
    "⧉".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            copy_icon: default_copy_icon(),
            wrap_bodies: true,
        }
    }
}

/// Load config by merging global defaults with per-repo overrides.
/// Priority: per-repo `.rt-config.toml` > global `~/.config/rt/config.toml` > built-in defaults.
/// Merging is deep: individual fields within sections (e.g. `[display]`) override independently.
pub fn load_config(repo_root: &str) -> RtConfig {
    let global_path = dirs::config_dir().map(|d| d.join("rt/config.toml"));
    let local_path = Path::new(repo_root).join(".rt-config.toml");
    load_config_from(global_path.as_deref(), &local_path)
}

fn load_config_from(global_path: Option<&Path>, local_path: &Path) -> RtConfig {
    let global_table = global_path.and_then(read_table);
    let local_table = read_table(local_path);

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return RtConfig::default(),
    };

    merged.try_into().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "invalid config, using defaults");
        RtConfig::default()
    })
}

/// A whole TOML document as a table. Missing files are silent; files that
/// fail to parse are logged and skipped.
fn read_table(path: &Path) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(table) => Some(table),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unparsable config");
            None
        }
    }
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_when_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(None, &dir.path().join(".rt-config.toml"));
        assert_eq!(config, RtConfig::default());
        assert_eq!(config.display.copy_icon, "⧉");
        assert!(config.display.wrap_bodies);
        assert!(config.routes.base_url.is_empty());
    }

    #[test]
    fn local_overrides_global_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join(".rt-config.toml");
        fs::write(
            &global,
            "[routes]\nbase_url = \"https://git.example.com\"\n[display]\ncopy_icon = \"C\"\nwrap_bodies = false\n",
        )
        .unwrap();
        fs::write(&local, "[display]\ncopy_icon = \"[c]\"\n").unwrap();

        let config = load_config_from(Some(&global), &local);
        assert_eq!(config.routes.base_url, "https://git.example.com");
        assert_eq!(config.display.copy_icon, "[c]");
        assert!(!config.display.wrap_bodies);
    }

    #[test]
    fn local_only() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".rt-config.toml");
        fs::write(&local, "[clipboard]\ncommand = \"wl-copy\"\n").unwrap();

        let config = load_config_from(None, &local);
        assert_eq!(config.clipboard.command, "wl-copy");
        assert!(config.clipboard.args.is_empty());
    }

    #[test]
    fn whole_document_with_every_section_loads() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".rt-config.toml");
        fs::write(
            &local,
            "[routes]\nbase_url = \"https://code.example.com\"\n\n\
             [clipboard]\ncommand = \"xsel\"\nargs = [\"-b\"]\n\n\
             [display]\ncopy_icon = \"C\"\nwrap_bodies = false\n",
        )
        .unwrap();

        let config = load_config_from(None, &local);
        assert_eq!(config.routes.base_url, "https://code.example.com");
        assert_eq!(config.clipboard.command, "xsel");
        assert_eq!(config.clipboard.args, vec!["-b".to_string()]);
        assert_eq!(config.display.copy_icon, "C");
        assert!(!config.display.wrap_bodies);
    }

    #[test]
    fn invalid_types_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".rt-config.toml");
        fs::write(&local, "[display]\nwrap_bodies = \"yes\"\n").unwrap();

        assert_eq!(load_config_from(None, &local), RtConfig::default());
    }

    #[test]
    fn unparsable_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".rt-config.toml");
        fs::write(&local, "not = [valid").unwrap();

        assert_eq!(load_config_from(None, &local), RtConfig::default());
    }

    #[test]
    fn deep_merge_replaces_scalars_and_merges_tables() {
        let mut base: toml::Table = toml::from_str("a = 1\n[t]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Table = toml::from_str("a = 2\n[t]\ny = 3\n").unwrap();
        deep_merge(&mut base, overlay);
        let t = base.get("t").and_then(|v| v.as_table()).unwrap();
        assert_eq!(base.get("a").and_then(|v| v.as_integer()), Some(2));
        assert_eq!(t.get("x").and_then(|v| v.as_integer()), Some(1));
        assert_eq!(t.get("y").and_then(|v| v.as_integer()), Some(3));
    }
}
