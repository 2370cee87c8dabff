//! 訂單模型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 提把類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleType {
    /// 平提把
    Flat,
    /// 扭繩提把（需專用機台）
    Twisted,
}

impl HandleType {
    /// 是否為特殊提把
    pub fn is_specialized(&self) -> bool {
        *self == HandleType::Twisted
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleType::Flat => "flat",
            HandleType::Twisted => "twisted",
        }
    }
}

impl fmt::Display for HandleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandleType {
    type Err = MalformedReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(HandleType::Flat),
            "twisted" => Ok(HandleType::Twisted),
            other => Err(MalformedReason::UnknownHandleType(other.to_string())),
        }
    }
}

/// 數量單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityUnit {
    /// 個（基本單位）
    #[default]
    Pieces,
    /// 包裝單位，按 `units_per_pack` 換算
    Packs,
}

/// 原始訂單（外部輸入，尚未驗證）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrder {
    /// 訂單ID
    pub id: String,

    /// 袋寬（mm）
    pub width: f64,

    /// 袋高（mm）
    pub height: f64,

    /// 側摺深度（mm）
    #[serde(default)]
    pub gusset: Option<f64>,

    /// 紙張克重（g/m²）
    pub gsm: f64,

    /// 提把類型（文字，驗證時解析）
    pub handle_type: String,

    /// 印刷色數
    #[serde(default)]
    pub colors: u8,

    /// 是否需要補強貼片
    #[serde(default)]
    pub needs_patch: bool,

    /// 訂購數量
    #[serde(default)]
    pub quantity: Option<f64>,

    /// 數量單位
    #[serde(default)]
    pub quantity_unit: QuantityUnit,

    /// 要求交期（天）
    #[serde(default)]
    pub delivery_days: Option<u32>,
}

impl RawOrder {
    /// 驗證並轉換為可排程訂單
    ///
    /// 數量一律換算為基本單位（個）。
    pub fn validate(&self, units_per_pack: u32) -> Result<Order, MalformedOrder> {
        let reject = |reason| MalformedOrder {
            order_id: self.id.clone(),
            reason,
        };

        let quantity = self.quantity.ok_or_else(|| reject(MalformedReason::MissingQuantity))?;
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(reject(MalformedReason::NonPositiveQuantity(quantity)));
        }

        let handle_type = self.handle_type.parse::<HandleType>().map_err(reject)?;

        for (name, value) in [("width", self.width), ("height", self.height), ("gsm", self.gsm)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(reject(MalformedReason::InvalidDimension {
                    field: name,
                    value,
                }));
            }
        }
        if let Some(gusset) = self.gusset {
            if !gusset.is_finite() || gusset < 0.0 {
                return Err(reject(MalformedReason::InvalidDimension {
                    field: "gusset",
                    value: gusset,
                }));
            }
        }

        let factor = match self.quantity_unit {
            QuantityUnit::Pieces => 1.0,
            QuantityUnit::Packs => f64::from(units_per_pack),
        };
        let base_units = (quantity * factor).round();
        if base_units < 1.0 {
            return Err(reject(MalformedReason::NonPositiveQuantity(base_units)));
        }

        Ok(Order {
            id: self.id.clone(),
            width: self.width,
            height: self.height,
            gusset: self.gusset,
            gsm: self.gsm,
            handle_type,
            colors: self.colors,
            needs_patch: self.needs_patch,
            quantity: base_units as u64,
            delivery_days: self.delivery_days,
        })
    }
}

/// 可排程訂單（已驗證，不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// 訂單ID
    pub id: String,

    /// 袋寬（mm）
    pub width: f64,

    /// 袋高（mm）
    pub height: f64,

    /// 側摺深度（mm）
    pub gusset: Option<f64>,

    /// 紙張克重（g/m²）
    pub gsm: f64,

    /// 提把類型
    pub handle_type: HandleType,

    /// 印刷色數
    pub colors: u8,

    /// 是否需要補強貼片
    pub needs_patch: bool,

    /// 數量（基本單位）
    pub quantity: u64,

    /// 要求交期（天），未指定時使用預設值
    pub delivery_days: Option<u32>,
}

impl Order {
    /// 創建新的訂單（尺寸採常用規格，可用建構器覆寫）
    pub fn new(id: impl Into<String>, quantity: u64, handle_type: HandleType) -> Self {
        Self {
            id: id.into(),
            width: 320.0,
            height: 420.0,
            gusset: None,
            gsm: 100.0,
            handle_type,
            colors: 1,
            needs_patch: false,
            quantity,
            delivery_days: None,
        }
    }

    /// 建構器模式：設置尺寸
    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// 建構器模式：設置側摺
    pub fn with_gusset(mut self, gusset: f64) -> Self {
        self.gusset = Some(gusset);
        self
    }

    /// 建構器模式：設置克重
    pub fn with_gsm(mut self, gsm: f64) -> Self {
        self.gsm = gsm;
        self
    }

    /// 建構器模式：設置色數
    pub fn with_colors(mut self, colors: u8) -> Self {
        self.colors = colors;
        self
    }

    /// 建構器模式：需要補強貼片
    pub fn with_patch(mut self, needs_patch: bool) -> Self {
        self.needs_patch = needs_patch;
        self
    }

    /// 建構器模式：設置交期
    pub fn with_delivery_days(mut self, days: u32) -> Self {
        self.delivery_days = Some(days);
        self
    }

    /// 交期（未指定時回傳預設值）
    pub fn delivery_days_or(&self, default_days: u32) -> u32 {
        self.delivery_days.unwrap_or(default_days)
    }
}

/// 不合格訂單（排程前即被拒絕）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedOrder {
    pub order_id: String,
    pub reason: MalformedReason,
}

impl fmt::Display for MalformedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "訂單 {}: {}", self.order_id, self.reason)
    }
}

/// 訂單不合格原因
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
pub enum MalformedReason {
    #[error("缺少訂購數量")]
    MissingQuantity,

    #[error("訂購數量必須為正數: {0}")]
    NonPositiveQuantity(f64),

    #[error("未知的提把類型: {0}")]
    UnknownHandleType(String),

    #[error("尺寸欄位 {field} 無效: {value}")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("訂單ID重複")]
    DuplicateId,
}
