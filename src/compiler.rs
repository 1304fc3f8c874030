use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Compilers {
    pub solc: SolcConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolcConfig {
    pub version: String,
    pub settings: SolcSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolcSettings {
    pub optimizer: Optimizer,
    pub evm_version: EvmVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimizer {
    pub enabled: bool,
    pub runs: u32,
}

/// Hard fork the compiler targets, spelled the way solc expects it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum EvmVersion {
    #[display(fmt = "homestead")]
    Homestead,
    #[display(fmt = "tangerineWhistle")]
    TangerineWhistle,
    #[display(fmt = "spuriousDragon")]
    SpuriousDragon,
    #[display(fmt = "byzantium")]
    Byzantium,
    #[display(fmt = "constantinople")]
    Constantinople,
    #[display(fmt = "petersburg")]
    Petersburg,
    #[display(fmt = "istanbul")]
    Istanbul,
    #[display(fmt = "berlin")]
    Berlin,
    #[display(fmt = "london")]
    London,
    #[display(fmt = "paris")]
    Paris,
    #[display(fmt = "shanghai")]
    Shanghai,
    #[display(fmt = "cancun")]
    Cancun,
}

impl Default for SolcConfig {
    fn default() -> Self {
        Self {
            version: "0.5.7".to_string(),
            settings: SolcSettings {
                optimizer: Optimizer {
                    enabled: true,
                    runs: 200,
                },
                evm_version: EvmVersion::Constantinople,
            },
        }
    }
}

impl SolcConfig {
    /// The same settings as `forge build` flags.
    pub fn forge_args(&self) -> Vec<String> {
        let mut args = vec!["--use".to_string(), self.version.clone()];

        if self.settings.optimizer.enabled {
            args.push("--optimize".to_string());
            args.push("--optimizer-runs".to_string());
            args.push(self.settings.optimizer.runs.to_string());
        }

        args.push("--evm-version".to_string());
        args.push(self.settings.evm_version.to_string());

        args
    }
}
