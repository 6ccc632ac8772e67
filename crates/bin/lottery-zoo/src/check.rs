use lottery_models::error::ModelError;
use lottery_models::init::initializer_from_name;
use lottery_models::plan::ChannelPlan;
use lottery_models::registry::RegisteredModel;
use lottery_models::simplecnn::SimpleCnnConfig;

/// What a model name resolves to, without building the model.
#[derive(Debug, Clone, PartialEq)]
pub struct NameReport {
    pub family: RegisteredModel,
    pub widths: Vec<usize>,
    pub features: usize,
}

pub fn check_name(model_name: &str) -> Result<NameReport, ModelError> {
    let family = RegisteredModel::for_name(model_name)
        .ok_or_else(|| ModelError::InvalidModelName(model_name.to_owned()))?;
    let plan = ChannelPlan::parse(family.prefix(), model_name)?;
    let config = SimpleCnnConfig::new(
        plan.clone(),
        family.input_shape(),
        initializer_from_name("kaiming_normal")?,
    );
    Ok(NameReport {
        family,
        widths: plan.into(),
        features: config.feature_count()?,
    })
}

/// Prints one line per name and returns how many were rejected.
pub fn check_names(model_names: &[String]) -> usize {
    let mut rejected = 0;
    for name in model_names {
        match check_name(name) {
            Ok(report) => println!(
                "{name}: {} with widths {:?}, {} features before the output layer",
                report.family, report.widths, report.features
            ),
            Err(e) => {
                rejected += 1;
                println!("{name}: {e}");
            }
        }
    }
    rejected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_report_their_plan() {
        let report = check_name("svhn_simplecnn_300").unwrap();
        assert_eq!(report.family, RegisteredModel::SvhnSimpleCnn);
        assert_eq!(report.widths, vec![300]);
        assert_eq!(report.features, 76800);
    }

    #[test]
    fn test_rejections_are_counted() {
        let names = vec![
            "mnist_simplecnn_16_32".to_string(),
            "mnist_simplecnn".to_string(),
            "mnist_simplecnn_1_1_1_1_1".to_string(),
        ];
        assert_eq!(check_names(&names), 2);
    }
}
