use envconfig::Envconfig;

use crate::generator::GeneratorConfig;
use crate::process::ProcessorConfig;
use crate::validate::ValidationConfig;

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(default = "0.20")]
    pub fault_probability: f64,
    #[envconfig(default = "0.15")]
    pub duplicate_probability: f64,

    #[envconfig(default = "0.0")]
    pub value_min: f64,
    #[envconfig(default = "50.0")]
    pub value_max: f64,

    #[envconfig(default = "false")]
    pub verbose: bool,

    #[envconfig(default = "input_stream.jsonl")]
    pub input_path: String,
    #[envconfig(default = "clean_data.jsonl")]
    pub clean_path: String,
    #[envconfig(default = "dead_letter.jsonl")]
    pub dead_letter_path: String,

    #[envconfig(default = "LAB_PRES_02")]
    pub sensor_id: String,
    #[envconfig(default = "1000")]
    pub sequence_start: i64,
    #[envconfig(default = "50")]
    pub record_count: usize,
}

impl Config {
    pub fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            fault_probability: self.fault_probability,
            duplicate_probability: self.duplicate_probability,
        }
    }

    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            value_min: self.value_min,
            value_max: self.value_max,
        }
    }

    pub fn processor(&self) -> ProcessorConfig {
        ProcessorConfig {
            validation: self.validation(),
            verbose: self.verbose,
        }
    }
}
