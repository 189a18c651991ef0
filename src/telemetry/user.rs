use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Anonymous installation id used as the analytics distinct id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserId {
    pub id: String,
    pub first_seen: chrono::DateTime<chrono::Utc>,
}

impl UserId {
    pub fn load_or_create() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::get_user_id_path()?;
        Self::load_or_create_at(&path)
    }

    pub fn load_or_create_at(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let user_id: UserId = serde_json::from_str(&content)?;
            return Ok(user_id);
        }

        let user_id = UserId {
            id: Uuid::new_v4().to_string(),
            first_seen: chrono::Utc::now(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&user_id)?;
        fs::write(path, content)?;

        Ok(user_id)
    }

    fn get_user_id_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = config_dir().ok_or("Could not determine config directory")?;
        Ok(config_dir.join("gcp-apictl").join("user_id"))
    }
}
