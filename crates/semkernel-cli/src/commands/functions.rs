//! Functions command handler

use semkernel::SemkernelApp;

use crate::error::Result;

pub async fn run_functions(app: &SemkernelApp, json: bool) -> Result<()> {
    if json {
        let metadata: Vec<_> = app.functions().collect();
        let rendered = serde_json::to_string_pretty(&metadata)
            .map_err(|e| crate::error::CliError::InvalidInput(format!("Failed to render functions: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("📚 Registered functions:");
    for function in app.functions() {
        let parameters = function
            .parameters
            .iter()
            .map(|p| {
                if p.is_required {
                    format!("{}: {}", p.name, p.type_name)
                } else {
                    format!("[{}: {}]", p.name, p.type_name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {}({}) -> {}",
            function.fully_qualified_name(),
            parameters,
            function.return_type.as_deref().unwrap_or("?")
        );
        if let Some(description) = &function.description {
            println!("      {description}");
        }
    }
    Ok(())
}
