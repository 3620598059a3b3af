use std::time::Duration;

use serde::{
	Deserialize,
	Deserializer,
};

pub fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
	D: Deserializer<'de>,
{
	let millis = u64::deserialize(deserializer)?;
	Ok(Duration::from_millis(millis))
}
