//! Cross-platform process spawning helpers.
//!
//! On Windows, spawning console binaries (ffmpeg, ffprobe) from a windowed
//! host application can cause a console window to appear for each
//! invocation. This module centralizes the Windows creation flags needed to
//! suppress that. Media-tool invocations are synchronous blocking calls, so
//! only the std process command needs configuring.

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Apply platform-specific flags to a std process command.
pub fn configure_std_command(cmd: &mut std::process::Command) {
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    #[cfg(not(target_os = "windows"))]
    let _ = cmd;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_command_can_be_configured() {
        #[cfg(target_os = "windows")]
        let mut cmd = std::process::Command::new("cmd");
        #[cfg(not(target_os = "windows"))]
        let mut cmd = std::process::Command::new("echo");
        configure_std_command(&mut cmd);
    }

    #[test]
    fn configured_command_can_execute() {
        #[cfg(target_os = "windows")]
        let mut cmd = std::process::Command::new("cmd");
        #[cfg(not(target_os = "windows"))]
        let mut cmd = std::process::Command::new("echo");

        configure_std_command(&mut cmd);

        #[cfg(target_os = "windows")]
        let output = cmd.args(["/C", "echo", "test"]).output();
        #[cfg(not(target_os = "windows"))]
        let output = cmd.arg("test").output();

        assert!(output.is_ok(), "Command should execute successfully");
        assert!(output.unwrap().status.success());
    }
}
