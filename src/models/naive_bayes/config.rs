use burn::config::Config;

/// Multinomial Naive Bayes configuration
#[derive(Config, Debug)]
pub struct NaiveBayesConfig {
    /// Additive (Laplace/Lidstone) smoothing
    #[config(default = 1.0)]
    pub alpha: f64,

    /// Learn class priors from the training labels; when false, priors are uniform
    #[config(default = true)]
    pub fit_prior: bool,
}
