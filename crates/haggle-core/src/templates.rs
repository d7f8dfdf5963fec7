//! Template engine collaborator.
//!
//! The negotiator only needs [`TemplateEngine::render`]. [`Templates`] is the
//! stock implementation on top of a shared `minijinja` environment, loaded
//! either from in-memory sources or lazily from a directory.

use std::path::Path;
use std::sync::Arc;

use minijinja::{AutoEscape, Environment};
use serde_json::{Map, Value};

use crate::error::TemplateError;
use crate::negotiator::Negotiator;

/// Renders a named template against a mapping of variables.
pub trait TemplateEngine: Send + Sync {
    /// Resolves `name` and renders it. Lookup failures must be returned, not
    /// replaced with fallback output.
    fn render(&self, name: &str, variables: &Map<String, Value>) -> Result<String, TemplateError>;
}

/// A cheaply cloneable, read-only set of Jinja templates.
///
/// Output is always HTML-escaped since every rendering is served as
/// `text/html`.
#[derive(Clone, Debug)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl Templates {
    /// Builds a store from `(name, source)` pairs. Fails on the first source
    /// with a syntax error.
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, minijinja::Error>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = html_environment();
        for (name, source) in sources {
            env.add_template_owned(name.into(), source.into())?;
        }
        Ok(Templates { env: Arc::new(env) })
    }

    /// Builds a store that loads templates from `dir` on first use. Names are
    /// paths relative to `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = html_environment();
        env.set_loader(minijinja::path_loader(dir));
        Templates { env: Arc::new(env) }
    }

    /// Whether `name` resolves to a template that parses.
    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// A negotiator that renders `template` from this store on the HTML path.
    pub fn negotiate(&self, template: impl Into<Arc<str>>) -> Negotiator {
        Negotiator::new(Arc::new(self.clone()), template)
    }
}

impl TemplateEngine for Templates {
    fn render(&self, name: &str, variables: &Map<String, Value>) -> Result<String, TemplateError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(variables)?)
    }
}

fn html_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env
}
