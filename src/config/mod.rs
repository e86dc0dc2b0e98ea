use anyhow::Result;

pub mod layout;
pub mod scenario;

pub use layout::*;
pub use scenario::*;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub layout: LayoutConfig,
    pub scenario: ScenarioConfig,
}

impl SimulationConfig {
    pub fn load_from_files(layout_path: &str, scenario_path: &str) -> Result<Self> {
        let layout_content = std::fs::read_to_string(layout_path)?;
        let scenario_content = std::fs::read_to_string(scenario_path)?;

        let layout: LayoutConfig = toml::from_str(&layout_content)?;
        let scenario: ScenarioConfig = toml::from_str(&scenario_content)?;

        // Validate configurations
        layout.validate()?;
        scenario.validate()?;

        Ok(SimulationConfig { layout, scenario })
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            scenario: ScenarioConfig::default(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
