//! Locating the add-on layer in a function's layer list.

use layerctl_core::{FunctionRecord, LayerArn};

/// First attached layer whose ARN contains `fragment`, in attachment order.
pub fn find_addon_layer<'a>(record: &'a FunctionRecord, fragment: &str) -> Option<&'a LayerArn> {
    record.layers.iter().find(|arn| arn.contains(fragment))
}

/// The layer list with every add-on layer removed, order otherwise kept.
pub fn without_addon_layers(layers: &[LayerArn], fragment: &str) -> Vec<LayerArn> {
    layers
        .iter()
        .filter(|arn| !arn.contains(fragment))
        .cloned()
        .collect()
}
