use serde::{Deserialize, Serialize};

/// 地図上で選択された場所。
///
/// 検索プロバイダは安定した場所 ID を保証しないので、
/// 識別は表示名と座標の近似一致のみで行う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// キーワード検索が返す候補。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub id: String,
    pub name: String,
    pub address: String,
    pub road_address: String,
    pub category: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub place_url: String,
}

impl PlaceCandidate {
    pub fn to_place(&self) -> Place {
        Place {
            name: self.name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
