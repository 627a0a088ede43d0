#![allow(dead_code)]

use globtask::config::{validate_config, ConfigFile, ConfigSection, TaskConfig};
use globtask::types::HashAlgorithm;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile {
                config: ConfigSection::default(),
                task: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.config.task.push(task);
        self
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.config.hash_algorithm = algorithm;
        self
    }

    pub fn with_watch_exclude(mut self, prefix: &str) -> Self {
        self.config.config.watch_exclude.push(prefix.to_string());
        self
    }

    /// Build and validate.
    pub fn build(self) -> ConfigFile {
        validate_config(&self.config).expect("Failed to build valid config from builder");
        self.config
    }

    /// Build without validation, for testing validation failures.
    pub fn build_unchecked(self) -> ConfigFile {
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(name: &str, pattern: &str, dest: &str) -> Self {
        Self {
            task: TaskConfig {
                name: name.to_string(),
                pattern: pattern.to_string(),
                dest: dest.to_string(),
                cmd: None,
                copy: false,
            },
        }
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.task.cmd = Some(cmd.to_string());
        self
    }

    pub fn copy(mut self) -> Self {
        self.task.copy = true;
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
