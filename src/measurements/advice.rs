//! Advice generation for one device's current readings.
//!
//! Each tip has its own threshold and is evaluated independently, in a fixed
//! order; several tips can co-occur. A missing value never triggers its tip.

/// Air-quality caution, fires at pm2_5 ≥ 56 (the "Very unhealthy" boundary).
pub const TIP_AIR_QUALITY: &str =
    "🚨 Air quality isn't great right now. If possible, try to stay indoors.";

/// Sun protection, fires above UV index 5.
pub const TIP_SUN: &str = "☀️ It's sunny out there! Don't forget your sunscreen and a hat. 😎";

/// Heat caution, fires above 35 °C.
pub const TIP_HEAT: &str = "🔥 It's really hot today. Stay cool and drink lots of water. 💧";

/// Wind caution, fires above 10.
pub const TIP_WIND: &str =
    "💨 It's a windy day. Hold on to your hat and be careful with loose items.";

/// Rain caution, fires above 15.
pub const TIP_RAIN: &str =
    "🌧 Looks like heavy rain is expected. Take an umbrella or stay cozy indoors.";

/// Fallback when no caution fires.
pub const TIP_GOOD_WEATHER: &str =
    "🌿 Beautiful weather outside – great time for a walk or some fresh air!";

/// Parsed numeric inputs for advice generation. `None` means the value was
/// absent or unparseable and the corresponding tip never triggers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdviceInputs {
    pub uv: Option<f64>,
    pub pm: Option<f64>,
    pub temp: Option<f64>,
    pub wind: Option<f64>,
    pub humidity: Option<f64>,
    pub rain: Option<f64>,
}

/// Generate the advice list for one device, order-preserving.
pub fn generate_advice(inputs: &AdviceInputs) -> Vec<&'static str> {
    let mut tips = Vec::new();

    if inputs.pm.is_some_and(|pm| pm >= 56.0) {
        tips.push(TIP_AIR_QUALITY);
    }
    if inputs.uv.is_some_and(|uv| uv > 5.0) {
        tips.push(TIP_SUN);
    }
    if inputs.temp.is_some_and(|t| t > 35.0) {
        tips.push(TIP_HEAT);
    }
    if inputs.wind.is_some_and(|w| w > 10.0) {
        tips.push(TIP_WIND);
    }
    if inputs.rain.is_some_and(|r| r > 15.0) {
        tips.push(TIP_RAIN);
    }
    if tips.is_empty() {
        tips.push(TIP_GOOD_WEATHER);
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_air_quality_alone_yields_one_tip() {
        let tips = generate_advice(&AdviceInputs {
            pm: Some(60.0),
            uv: Some(2.0),
            temp: Some(20.0),
            wind: Some(5.0),
            rain: Some(0.0),
            humidity: None,
        });
        assert_eq!(tips, vec![TIP_AIR_QUALITY]);
    }

    #[test]
    fn calm_conditions_yield_default_tip() {
        let tips = generate_advice(&AdviceInputs {
            pm: Some(0.0),
            uv: Some(0.0),
            temp: Some(0.0),
            wind: Some(0.0),
            rain: Some(0.0),
            humidity: Some(40.0),
        });
        assert_eq!(tips, vec![TIP_GOOD_WEATHER]);
    }

    #[test]
    fn multiple_tips_preserve_order() {
        let tips = generate_advice(&AdviceInputs {
            pm: Some(60.0),
            uv: Some(9.0),
            temp: Some(36.0),
            wind: Some(20.0),
            rain: Some(16.0),
            humidity: Some(50.0),
        });
        assert_eq!(
            tips,
            vec![TIP_AIR_QUALITY, TIP_SUN, TIP_HEAT, TIP_WIND, TIP_RAIN]
        );
    }

    #[test]
    fn missing_values_never_trigger() {
        let tips = generate_advice(&AdviceInputs::default());
        assert_eq!(tips, vec![TIP_GOOD_WEATHER]);
    }

    #[test]
    fn thresholds_are_strict_where_source_is_strict() {
        // pm uses >=, the rest use >
        let at_boundary = generate_advice(&AdviceInputs {
            pm: Some(56.0),
            uv: Some(5.0),
            temp: Some(35.0),
            wind: Some(10.0),
            rain: Some(15.0),
            humidity: None,
        });
        assert_eq!(at_boundary, vec![TIP_AIR_QUALITY]);
    }
}
