use std::path::Path;

use serde::{Deserialize, Serialize};

use anyhow::{bail, Error};

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct RootFs {
    #[serde(rename = "type", default = "default_root_type")]
    pub root_type: String,
    pub diff_ids: Option<Vec<String>>,
}

fn default_root_type() -> String {
    String::from("layers")
}

impl Default for RootFs {
    fn default() -> Self {
        Self {
            root_type: default_root_type(),
            diff_ids: Some(Default::default()),
        }
    }
}

impl RootFs {
    pub fn add_layer(&mut self, digest: impl AsRef<str>) {
        self.diff_ids
            .get_or_insert_with(Vec::default)
            .push(digest.as_ref().to_string());
    }
}

/// The subset of an image config the layer check reads.
#[derive(Deserialize, Serialize, Default, Debug, PartialEq, Eq, Clone)]
pub struct Config {
    pub architecture: Option<String>,
    pub os: Option<String>,
    pub rootfs: Option<RootFs>,
}

impl Config {
    pub fn with_layers<I, S>(layers: I) -> Config
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Config::default();
        for l in layers {
            cfg.add_layer(l);
        }
        cfg
    }

    pub fn add_layer(&mut self, digest: impl AsRef<str>) {
        self.rootfs
            .get_or_insert_with(RootFs::default)
            .add_layer(digest);
    }

    /// Layer digests from `rootfs.diff_ids`, base layer first.
    pub fn layers(&self) -> Result<&[String], Error> {
        match self.rootfs.as_ref().and_then(|r| r.diff_ids.as_ref()) {
            Some(diff_ids) => Ok(diff_ids.as_slice()),
            None => bail!("Image config is missing rootfs.diff_ids"),
        }
    }

    pub fn parse_str(s: impl AsRef<str>) -> Result<Config, Error> {
        Ok(serde_json::from_str(s.as_ref())?)
    }

    pub fn write_file(&self, f: impl AsRef<Path>) -> Result<(), Error> {
        use std::fs::File;
        use std::io::BufWriter;

        let file = File::create(f.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspected_config() {
        let raw = r#"{
            "architecture": "amd64",
            "os": "linux",
            "config": {"Env": ["PATH=/usr/bin"], "Cmd": ["/bin/sh"]},
            "history": [{"created": "2023-08-07T19:20:20Z", "created_by": "ADD file"}],
            "rootfs": {
                "type": "layers",
                "diff_ids": ["sha256:aaa", "sha256:bbb"]
            }
        }"#;
        let cfg = Config::parse_str(raw).expect("Should parse config");
        assert_eq!(cfg.os.as_deref(), Some("linux"));
        assert_eq!(
            cfg.layers().unwrap(),
            &["sha256:aaa".to_string(), "sha256:bbb".to_string()]
        );
    }

    #[test]
    fn test_missing_diff_ids_is_an_error() {
        let cfg = Config::parse_str(r#"{"os": "linux"}"#).unwrap();
        assert!(cfg.layers().is_err());

        let cfg = Config::parse_str(r#"{"rootfs": {"type": "layers"}}"#).unwrap();
        assert!(cfg.layers().is_err());
    }

    #[test]
    fn test_with_layers() {
        let cfg = Config::with_layers(["sha256:1", "sha256:2"]);
        assert_eq!(cfg.rootfs.as_ref().unwrap().root_type, "layers");
        assert_eq!(cfg.layers().unwrap().len(), 2);
    }

    #[test]
    fn test_rootfs_type_is_optional() {
        let cfg = Config::parse_str(r#"{"rootfs": {"diff_ids": ["sha256:a"]}}"#)
            .expect("rootfs without a type should parse");
        assert_eq!(cfg.layers().unwrap(), &["sha256:a".to_string()]);
        assert_eq!(cfg.rootfs.unwrap().root_type, "layers");
    }
}
