use std::time::Duration;

use sphere::app::Workbench;
use sphere::kernel::services::adapters::{ensure_settings_file, load_settings};
use sphere::kernel::services::ports::Settings;
use sphere::kernel::Action;

mod logging;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> std::io::Result<()> {
    if let Err(e) = ensure_settings_file() {
        eprintln!("settings unavailable: {e}");
    }
    let settings = load_settings().unwrap_or_else(Settings::default);

    let _logging = match logging::init(settings.log_filter.as_deref()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("logging disabled: {e}");
            None
        }
    };

    let mut workbench = Workbench::from_settings(&settings)?;
    workbench.dispatch(Action::LoadProjects);
    workbench.run_until_idle(STARTUP_TIMEOUT);

    let Some(project) = std::env::args().nth(1) else {
        for project in &workbench.state().projects {
            println!("{project}");
        }
        return Ok(());
    };

    workbench.dispatch(Action::SelectProject(project));
    workbench.run_until_idle(STARTUP_TIMEOUT);

    let state = workbench.state();
    if let Some(status) = &state.ui.status {
        eprintln!("{}", status.message);
    }
    match state.session.tree_rows() {
        Ok(rows) => {
            for row in rows {
                let indent = "  ".repeat(row.depth as usize);
                let suffix = if row.is_folder { "/" } else { "" };
                println!("{indent}{}{suffix}", row.name);
            }
        }
        Err(e) => eprintln!("{e}"),
    }
    Ok(())
}
