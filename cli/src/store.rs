use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use encoding_rs::Encoding;
use encounter_engine::{Encounter, EncounterStore};

/// One pretty-printed `<id>.json` file per encounter.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            bail!("invalid encounter id '{}'", id);
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).map(|p| p.exists()).unwrap_or(false)
    }
}

/// Decodes UTF-8/UTF-16 files with a BOM, plain UTF-8 otherwise.
pub fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

impl EncounterStore for FileStore {
    fn load(&self, id: &str) -> Result<Encounter> {
        let path = self.path_for(id)?;
        let text = read_text_auto(&path)
            .with_context(|| format!("failed to read encounter JSON: {}", path.display()))?;
        let encounter = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse encounter JSON: {}", path.display()))?;
        Ok(encounter)
    }

    fn save(&mut self, encounter: &Encounter) -> Result<()> {
        let path = self.path_for(&encounter.id)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create store dir: {}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(encounter)?;
        // atomic replace
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write: {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("failed to replace: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "saved encounter");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encounter_engine::content::builtin_encounter;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let enc = builtin_encounter("goblin_ambush").unwrap();
        store.save(&enc).unwrap();
        assert!(store.exists("goblin_ambush"));
        assert_eq!(store.load("goblin_ambush").unwrap(), enc);
    }

    #[test]
    fn utf8_bom_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let body = r#"{"id":"bom","name":"Bom"}"#;
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(body.as_bytes());
        fs::write(dir.path().join("bom.json"), bytes).unwrap();
        let enc = store.load("bom").unwrap();
        assert_eq!(enc.name, "Bom");
        assert!(enc.participants.is_empty());
    }

    #[test]
    fn path_traversal_ids_are_rejected() {
        let store = FileStore::new("/tmp");
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("").is_err());
    }
}
