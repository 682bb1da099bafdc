use askama::Template;

#[derive(Template)]
#[template(path = "sw.js", escape = "none")]
pub(crate) struct ServiceWorkerTemplate {
    /// App name as a quoted JavaScript string literal.
    pub(crate) app_name_literal: String,
}

impl ServiceWorkerTemplate {
    pub(crate) fn new(app_name: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            app_name_literal: serde_json::to_string(app_name)?,
        })
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn service_worker_template__should_quote_app_name_for_javascript() {
        // Given
        let template = ServiceWorkerTemplate::new("Bob's \"Cup\"").expect("template");

        // When
        let script = template.render().expect("render");

        // Then
        assert!(script.contains(r#"data.title || "Bob's \"Cup\"""#));
    }
}
