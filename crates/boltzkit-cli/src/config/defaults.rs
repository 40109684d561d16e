/// File-level defaults of the command line. Run parameter defaults live with
/// `RunConfig` in the core crate.
pub struct DefaultsConfig {
    pub params_file: String,
    pub prepared_yaml: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            params_file: "run_params.txt".to_string(),
            prepared_yaml: "params.yaml".to_string(),
        }
    }
}
