use burn::nn::Initializer;

use crate::error::ModelError;

pub const SUPPORTED_INITIALIZERS: [&str; 4] = [
    "kaiming_normal",
    "kaiming_uniform",
    "xavier_normal",
    "xavier_uniform",
];

/// Resolves a `model_init` name to the initializer applied to every weight and bias.
///
/// Kaiming variants use the gain of a ReLU network and scale by fan-in.
pub fn initializer_from_name(name: &str) -> Result<Initializer, ModelError> {
    let relu_gain = std::f64::consts::SQRT_2;
    match name {
        "kaiming_normal" => Ok(Initializer::KaimingNormal {
            gain: relu_gain,
            fan_out_only: false,
        }),
        "kaiming_uniform" => Ok(Initializer::KaimingUniform {
            gain: relu_gain,
            fan_out_only: false,
        }),
        "xavier_normal" => Ok(Initializer::XavierNormal { gain: 1.0 }),
        "xavier_uniform" => Ok(Initializer::XavierUniform { gain: 1.0 }),
        _ => Err(ModelError::UnknownInitializer(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_name_resolves() {
        for name in SUPPORTED_INITIALIZERS {
            assert!(initializer_from_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            initializer_from_name("orthogonal"),
            Err(ModelError::UnknownInitializer(name)) if name == "orthogonal"
        ));
    }
}
