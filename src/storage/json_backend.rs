use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::expense::ExpenseRegister;
use crate::utils::ensure_dir;

use super::{Result, StorageBackend};

const REGISTER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores registers as pretty JSON files under `<root>/registers/`.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    registers_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        let registers_dir = root.join("registers");
        ensure_dir(&registers_dir)?;
        Ok(Self {
            root,
            registers_dir,
        })
    }

    pub fn register_path(&self, name: &str) -> PathBuf {
        self.registers_dir
            .join(format!("{}.{}", canonical_name(name), REGISTER_EXTENSION))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn list_registers(&self) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.registers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(REGISTER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                entries.push(stem.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, register: &ExpenseRegister, name: &str) -> Result<()> {
        save_register_to_path(register, &self.register_path(name))
    }

    fn load(&self, name: &str) -> Result<ExpenseRegister> {
        load_register_from_path(&self.register_path(name))
    }
}

/// Writes through a sibling `.tmp` file and renames so a crash mid-write
/// cannot truncate an existing register.
pub fn save_register_to_path(register: &ExpenseRegister, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(register)?;
    let tmp = tmp_path(path);
    write_all(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_register_from_path(path: &Path) -> Result<ExpenseRegister> {
    let data = fs::read_to_string(path)?;
    let register: ExpenseRegister = serde_json::from_str(&data)?;
    Ok(register)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "register".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(temp.path().to_path_buf()).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let register = ExpenseRegister::new("Acme Corp");
        storage.save(&register, "Acme Corp").expect("save register");
        let loaded = storage.load("Acme Corp").expect("load register");
        assert_eq!(loaded.name, "Acme Corp");
        assert_eq!(loaded.id, register.id);
    }

    #[test]
    fn register_names_are_canonicalised() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.register_path("Acme Corp / HR");
        assert!(path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap()
            .starts_with("acme_corp"));
    }

    #[test]
    fn list_registers_returns_sorted_stems() {
        let (storage, _guard) = storage_with_temp_dir();
        storage
            .save(&ExpenseRegister::new("Beta"), "Beta")
            .expect("save");
        storage
            .save(&ExpenseRegister::new("Acme"), "Acme")
            .expect("save");
        let names = storage.list_registers().expect("list");
        assert_eq!(names, vec!["acme".to_string(), "beta".to_string()]);
    }

    #[test]
    fn missing_register_surfaces_io_error() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.load("nope").is_err());
    }
}
