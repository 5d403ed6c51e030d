//! Daemon lifecycle management (stop, status).

use resolar_config_and_utils::Paths;
use resolar_ipc::{IpcClient, Method};

/// Stop the daemon.
pub async fn stop_daemon(paths: &Paths) -> Result<(), Box<dyn std::error::Error>> {
    let socket_path = paths.socket_file();
    let pid_path = paths.pid_file();

    if !socket_path.exists() {
        println!("Daemon is not running (socket not found)");
        if pid_path.exists() {
            let _ = std::fs::remove_file(&pid_path);
        }
        return Ok(());
    }

    let client = IpcClient::new(&socket_path.to_string_lossy());
    match client.call_method(Method::Shutdown).await {
        Ok(response) if response.is_success() => println!("Daemon shutdown initiated"),
        Ok(response) => println!("Shutdown failed: {:?}", response.error),
        Err(e) => println!("Failed to connect to daemon: {}", e),
    }

    // Wait up to 3 seconds for the socket to disappear
    for _ in 0..30 {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        if !socket_path.exists() {
            println!("Daemon stopped");
            return Ok(());
        }
    }

    if let Some(pid) = read_pid(paths) {
        println!(
            "Daemon did not stop gracefully, sending SIGKILL to PID {}",
            pid
        );
        // SAFETY: kill(2) has no memory-safety preconditions.
        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
        let _ = std::fs::remove_file(&socket_path);
        let _ = std::fs::remove_file(&pid_path);
        println!("Daemon killed");
        return Ok(());
    }

    if socket_path.exists() {
        let _ = std::fs::remove_file(&socket_path);
        println!("Cleaned up stale socket file");
    }

    Ok(())
}

/// Check daemon status.
pub async fn check_status(paths: &Paths) -> Result<(), Box<dyn std::error::Error>> {
    let socket_path = paths.socket_file();

    if !socket_path.exists() {
        println!("Daemon is not running (socket not found)");
        return Ok(());
    }

    let client = IpcClient::new(&socket_path.to_string_lossy());
    match client.call_method(Method::Health).await {
        Ok(response) => match (response.result, response.error) {
            (Some(result), None) => {
                let field = |name: &str| {
                    result
                        .get(name)
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown")
                        .to_string()
                };
                println!("Daemon is running");
                println!("  Status:  {}", field("status"));
                println!("  Version: {}", field("version"));
                println!("  API:     {}", field("api_base_url"));
                if let Some(pid) = read_pid(paths) {
                    println!("  PID:     {}", pid);
                }
                println!("  Socket:  {}", socket_path.display());
            }
            (_, Some(error)) => println!("Daemon returned error: {}", error.message),
            (None, None) => println!("Daemon is running (no details available)"),
        },
        Err(e) => {
            println!("Failed to connect to daemon: {}", e);
            println!("Daemon may not be running or socket may be stale");
        }
    }

    Ok(())
}

fn read_pid(paths: &Paths) -> Option<i32> {
    std::fs::read_to_string(paths.pid_file())
        .ok()?
        .trim()
        .parse()
        .ok()
}
