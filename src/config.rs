use std::{fmt::Debug, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    core::tariff::{dynamic::DynamicTariff, fixed::FixedTariff},
    prelude::*,
};

/// Rate tables of both tariffs.
///
/// Any value missing from the file keeps its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[must_use]
pub struct TariffConfig {
    pub dynamic: DynamicTariff,
    pub fixed: FixedTariff,
}

impl TariffConfig {
    /// Read the file if given, fall back to the defaults otherwise.
    pub fn load<P: AsRef<Path> + Debug>(path: Option<P>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::read_from)
    }

    #[instrument]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!("loaded the rate tables");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::energy::KilowattHours;

    #[test]
    fn test_empty_file_is_default() -> Result {
        assert_eq!(toml::from_str::<TariffConfig>("")?, TariffConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Result {
        // language=toml
        let config: TariffConfig = toml::from_str(
            r"
                [dynamic]
                network_subscription = 2.5

                [dynamic.consumption]
                coefficient = 0.0011
                offset = 0.005

                [fixed.grid]
                capacity = 60.0
            ",
        )?;
        assert_abs_diff_eq!(config.dynamic.network_subscription.0, 2.5);
        assert_abs_diff_eq!(config.dynamic.supplier_subscription.0, 5.0);
        assert_abs_diff_eq!(config.dynamic.consumption.coefficient, 0.0011);
        assert_abs_diff_eq!(config.dynamic.injection.coefficient, 0.000_98);
        assert_abs_diff_eq!(config.fixed.grid.capacity.0, 60.0);
        assert_abs_diff_eq!(config.dynamic.grid.capacity.0, 56.93);
        assert_abs_diff_eq!(config.fixed.grid.distribution.0, 0.070_438_6);
        Ok(())
    }

    #[test]
    fn test_excise_override() -> Result {
        // language=toml
        let config: TariffConfig = toml::from_str(
            r"
                [[fixed.excise]]
                up_to = 1000.0
                rate = 0.05

                [[fixed.excise]]
                rate = 0.04
            ",
        )?;
        let excise = config.fixed.excise.excise(KilowattHours::from(1_500.0));
        assert_abs_diff_eq!(excise.0, 70.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_invalid_excise_is_rejected() {
        // language=toml
        let result = toml::from_str::<TariffConfig>(
            r"
                [[fixed.excise]]
                up_to = 1000.0
                rate = 0.05
            ",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_defaults() -> Result {
        let toml = TariffConfig::default().to_toml()?;
        assert_eq!(toml::from_str::<TariffConfig>(&toml)?, TariffConfig::default());
        Ok(())
    }
}
