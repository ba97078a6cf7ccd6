//! Per-function `OTEL_RESOURCE_ATTRIBUTES` rendering.
//!
//! The template is fixed and compiled once; it is rendered for every selected
//! function, so renaming a function yields a different value on the next run.

use tera::{Context, Tera};

use crate::error::ConfigError;
use crate::types::FunctionName;

const TEMPLATE_NAME: &str = "resource_attributes";

/// `service.name` is always present; `asserts.env` and `asserts.site` only
/// when a value is known.
pub const RESOURCE_ATTRIBUTES_TEMPLATE: &str = "service.name={{ function_name }}\
{% if environment %},asserts.env={{ environment }}{% endif %}\
{% if site %},asserts.site={{ site }}{% endif %}";

/// Compiled resource-attribute template.
#[derive(Debug)]
pub struct ResourceAttributesTemplate {
    tera: Tera,
}

impl ResourceAttributesTemplate {
    pub fn new() -> Result<Self, ConfigError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, RESOURCE_ATTRIBUTES_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(
        &self,
        function_name: &FunctionName,
        environment: Option<&str>,
        site: Option<&str>,
    ) -> Result<String, ConfigError> {
        let mut ctx = Context::new();
        ctx.insert("function_name", &function_name.0);
        ctx.insert("environment", &environment);
        ctx.insert("site", &site);
        Ok(self.tera.render(TEMPLATE_NAME, &ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_name_env_and_site() {
        let t = ResourceAttributesTemplate::new().expect("template");
        let out = t
            .render(&FunctionName::from("orders"), Some("prod"), Some("us-west-2"))
            .expect("render");
        assert_eq!(out, "service.name=orders,asserts.env=prod,asserts.site=us-west-2");
    }

    #[test]
    fn omits_unknown_segments() {
        let t = ResourceAttributesTemplate::new().expect("template");
        let out = t.render(&FunctionName::from("orders"), None, None).expect("render");
        assert_eq!(out, "service.name=orders");

        let out = t
            .render(&FunctionName::from("orders"), None, Some("eu-west-1"))
            .expect("render");
        assert_eq!(out, "service.name=orders,asserts.site=eu-west-1");
    }

    #[test]
    fn values_are_not_html_escaped() {
        let t = ResourceAttributesTemplate::new().expect("template");
        let out = t
            .render(&FunctionName::from("a&b"), Some("<dev>"), None)
            .expect("render");
        assert_eq!(out, "service.name=a&b,asserts.env=<dev>");
    }
}
