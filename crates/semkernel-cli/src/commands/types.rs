//! Types command handler

use semkernel::SemkernelApp;

use crate::error::Result;

/// Short names of the converters registered on the app's kernel, sorted
pub fn registered_types(app: &SemkernelApp) -> Vec<String> {
    let mut names: Vec<String> = app
        .kernel()
        .context_variable_types()
        .tags()
        .iter()
        .map(|tag| tag.short_name())
        .collect();
    names.sort();
    names
}

pub async fn run_types(app: &SemkernelApp) -> Result<()> {
    println!("🔧 Registered context variable types:");
    for name in registered_types(app) {
        println!("  {name}");
    }
    Ok(())
}
