//! Console output for command results.

use inputsw_core::{PlatformInfo, ValidationOutcome};
use inputsw_ddc::{Blocked, DispatchResult};

pub fn blocked(b: &Blocked) {
    println!("[FAIL] {}", b.title);
    println!("       {}", b.detail);
}

pub fn warning(reason: &str) {
    println!("[WARN] {}", reason);
}

pub fn dispatch(result: &DispatchResult) {
    if result.is_success() {
        println!("[OK]   {}", result.message);
        if let Some(ref raw) = result.raw_output {
            println!("       {}", raw);
        }
    } else {
        println!("[FAIL] {}", result.title());
        println!("       {}", result.message);
        match result.raw_output {
            Some(ref raw) if raw.trim() != result.message => {
                println!("       Tool output: {}", raw.trim());
            }
            _ => {}
        }
    }
}

pub fn platform(info: &PlatformInfo) {
    println!("── Platform ──");
    println!("  OS:              {}", info.os_family);
    println!("  Silicon:         {}", info.silicon);
    println!(
        "  Built-in HDMI:   {}",
        if info.supports_builtin_hdmi_switch {
            "supported"
        } else {
            "not supported"
        }
    );
}

pub fn validation(outcome: &ValidationOutcome) {
    match outcome {
        ValidationOutcome::Ready => println!("[OK]   Ready to switch inputs"),
        ValidationOutcome::SoftWarning { reason } => warning(reason),
        ValidationOutcome::BlockingFailure { title, detail } => blocked(&Blocked {
            title: title.clone(),
            detail: detail.clone(),
        }),
    }
}
