use esp_idf_svc::nvs::{EspDefaultNvs, EspDefaultNvsPartition};

/// Build-time defaults, read from `cfg.toml`
#[toml_cfg::toml_config]
pub struct Config {
    #[default("")]
    wifi_ssid: &'static str,
    #[default("")]
    wifi_psk: &'static str,
    #[default("")]
    report_url: &'static str,
}

#[derive(Debug)]
pub struct MonitorConfig {
    pub sta: Option<WifiConfig>,
    pub report_url: String,
}

#[derive(Debug)]
pub struct WifiConfig {
    pub ssid: String,
    pub psk: Option<String>,
}

impl MonitorConfig {
    /// Values stored in NVS take precedence over the build-time ones.
    pub fn load() -> Result<Self, anyhow::Error> {
        let nvs = EspDefaultNvs::new(EspDefaultNvsPartition::take()?, "currentmon", true)?;

        Ok(Self {
            sta: WifiConfig::load(&nvs, "sta")?.or_else(WifiConfig::built_in),
            report_url: get_string(&nvs, "report.url")?.unwrap_or(CONFIG.report_url.into()),
        })
    }
}

impl WifiConfig {
    fn load(nvs: &EspDefaultNvs, prefix: &str) -> Result<Option<Self>, anyhow::Error> {
        let ssid = get_string(nvs, &format!("{prefix}.ssid"))?;
        if let Some(ssid) = ssid {
            Ok(Some(WifiConfig {
                ssid,
                psk: get_string(nvs, &format!("{prefix}.psk"))?,
            }))
        } else {
            Ok(None)
        }
    }

    fn built_in() -> Option<Self> {
        if CONFIG.wifi_ssid.is_empty() {
            return None;
        }
        Some(WifiConfig {
            ssid: CONFIG.wifi_ssid.into(),
            psk: (!CONFIG.wifi_psk.is_empty()).then(|| CONFIG.wifi_psk.into()),
        })
    }
}

fn get_string(nvs: &EspDefaultNvs, key: &str) -> Result<Option<String>, anyhow::Error> {
    let len = nvs.str_len(key)?;
    if let Some(len) = len {
        let mut buf = vec![0u8; len];
        Ok(nvs.get_str(key, &mut buf)?.map(|s| s.trim_end_matches('\0').into()))
    } else {
        Ok(None)
    }
}
