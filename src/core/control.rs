//! # Control Payloads and Cards
//!
//! The device-control AI answers with a JSON object keyed by device name.
//! `ControlPayload` is the typed view of that object; `ControlCard` is the
//! display model the TUI draws for it.
//!
//! ```text
//! {"风扇":  {"开关": "on", "风速": "2", "理由": "..."},
//!  "LED灯": {"开关": "on", "色温": "warm", "理由": "..."},
//!  "窗帘":  {"开关": "off", "理由": "..."}}
//! ```
//!
//! Keys the server invents beyond these three are dropped by serde.

use serde::{Deserialize, Serialize, de};
use serde_json::Value;

pub const FAN_KEY: &str = "风扇";
pub const LIGHT_KEY: &str = "LED灯";
pub const CURTAIN_KEY: &str = "窗帘";

pub const SWITCH_FIELD: &str = "开关";
pub const SPEED_FIELD: &str = "风速";
pub const COLOR_TEMP_FIELD: &str = "色温";
pub const REASON_FIELD: &str = "理由";

/// Heading shown at the top of every control card.
pub const CARD_HEADING: &str = "AI control command";

/// Shown in place of a field the payload left out.
const MISSING_VALUE: &str = "-";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FanSection {
    #[serde(rename = "开关", default)]
    pub switch: Option<Value>,
    #[serde(rename = "风速", default)]
    pub speed: Option<Value>,
    #[serde(rename = "理由", default)]
    pub reason: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LightSection {
    #[serde(rename = "开关", default)]
    pub switch: Option<Value>,
    #[serde(rename = "色温", default)]
    pub color_temperature: Option<Value>,
    #[serde(rename = "理由", default)]
    pub reason: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CurtainSection {
    #[serde(rename = "开关", default)]
    pub switch: Option<Value>,
    #[serde(rename = "理由", default)]
    pub reason: Option<Value>,
}

/// Parsed body of an `AI_CONTROL: ` message. Every section is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ControlPayload {
    #[serde(rename = "风扇", default)]
    pub fan: Option<FanSection>,
    #[serde(rename = "LED灯", default)]
    pub light: Option<LightSection>,
    #[serde(rename = "窗帘", default)]
    pub curtain: Option<CurtainSection>,
}

impl ControlPayload {
    /// Parse a payload. The body and every known section must be JSON
    /// objects (a section may also be `null`); serde alone would accept
    /// arrays and fill fields by position.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(sections) = &value else {
            return Err(de::Error::custom(format!(
                "expected a JSON object, found {}",
                kind_of(&value)
            )));
        };
        for key in [FAN_KEY, LIGHT_KEY, CURTAIN_KEY] {
            match sections.get(key) {
                None | Some(Value::Null) | Some(Value::Object(_)) => {}
                Some(other) => {
                    return Err(de::Error::custom(format!(
                        "section {key} must be an object, found {}",
                        kind_of(other)
                    )));
                }
            }
        }
        serde_json::from_value(value)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One labelled device block inside a card.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceBlock {
    pub label: &'static str,
    /// (field label, rendered value) in display order
    pub fields: Vec<(&'static str, String)>,
}

impl DeviceBlock {
    /// Look up a rendered field value by its label.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, value)| value.as_str())
    }
}

/// Display model of a control payload: a heading plus one block per device present.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlCard {
    pub heading: &'static str,
    pub blocks: Vec<DeviceBlock>,
}

impl ControlCard {
    /// Build the card. Devices are checked in a fixed order: fan, light, curtain.
    pub fn from_payload(payload: &ControlPayload) -> Self {
        let mut blocks = Vec::new();

        if let Some(fan) = &payload.fan {
            blocks.push(DeviceBlock {
                label: FAN_KEY,
                fields: vec![
                    (SWITCH_FIELD, render_value(&fan.switch)),
                    (SPEED_FIELD, render_value(&fan.speed)),
                    (REASON_FIELD, render_value(&fan.reason)),
                ],
            });
        }
        if let Some(light) = &payload.light {
            blocks.push(DeviceBlock {
                label: LIGHT_KEY,
                fields: vec![
                    (SWITCH_FIELD, render_value(&light.switch)),
                    (COLOR_TEMP_FIELD, render_value(&light.color_temperature)),
                    (REASON_FIELD, render_value(&light.reason)),
                ],
            });
        }
        if let Some(curtain) = &payload.curtain {
            blocks.push(DeviceBlock {
                label: CURTAIN_KEY,
                fields: vec![
                    (SWITCH_FIELD, render_value(&curtain.switch)),
                    (REASON_FIELD, render_value(&curtain.reason)),
                ],
            });
        }

        Self {
            heading: CARD_HEADING,
            blocks,
        }
    }

    /// Number of text lines the card body needs: heading, then per block a
    /// label line plus one line per field.
    pub fn line_count(&self) -> usize {
        1 + self
            .blocks
            .iter()
            .map(|b| 1 + b.fields.len())
            .sum::<usize>()
    }
}

/// Strings verbatim, everything else as compact JSON.
fn render_value(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => MISSING_VALUE.to_string(),
    }
}
