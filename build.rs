use std::{env, fs, path::PathBuf};

// RP2040 with 2 MB flash; the first 256 bytes hold the second-stage bootloader.
const MEMORY_PICO1: &str = "MEMORY {
    BOOT2 : ORIGIN = 0x10000000, LENGTH = 0x100
    FLASH : ORIGIN = 0x10000100, LENGTH = 2048K - 0x100
    RAM   : ORIGIN = 0x20000000, LENGTH = 256K
}
";

// RP2350 ARM core with 4 MB flash. The boot ROM looks for the image definition in
// `.start_block`, so it must follow the vector table.
const MEMORY_PICO2: &str = "MEMORY {
    FLASH : ORIGIN = 0x10000000, LENGTH = 4096K
    RAM   : ORIGIN = 0x20000000, LENGTH = 512K
    SRAM8 : ORIGIN = 0x20080000, LENGTH = 4K
    SRAM9 : ORIGIN = 0x20081000, LENGTH = 4K
}

SECTIONS {
    .start_block : ALIGN(4)
    {
        __start_block_addr = .;
        KEEP(*(.start_block));
        KEEP(*(.boot_info));
    } > FLASH
} INSERT AFTER .vector_table;

_stext = ADDR(.start_block) + SIZEOF(.start_block);

SECTIONS {
    .bi_entries : ALIGN(4)
    {
        __bi_entries_start = .;
        KEEP(*(.bi_entries));
        . = ALIGN(4);
        __bi_entries_end = .;
    } > FLASH
} INSERT AFTER .text;

SECTIONS {
    .end_block : ALIGN(4)
    {
        __end_block_addr = .;
        KEEP(*(.end_block));
    } > FLASH
} INSERT AFTER .uninit;

PROVIDE(start_to_end = __end_block_addr - __start_block_addr);
PROVIDE(end_to_start = __start_block_addr - __end_block_addr);
";

fn main() {
    // 1) Handle memory.x based on target
    let target = env::var("TARGET").unwrap_or_default();
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let memory_x = if target.starts_with("thumbv8m") {
        Some(MEMORY_PICO2)
    } else if target.starts_with("thumbv6m") {
        Some(MEMORY_PICO1)
    } else {
        None
    };
    if let Some(memory_x) = memory_x {
        let dest = out_dir.join("memory.x");
        fs::write(&dest, memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
    }

    // 2) Load optional env files (still supported for convenience)
    let _ = dotenvy::from_filename(".env");
    load_home_env(".pico.env");
    load_home_env(".env");

    // 3) Strip configuration with fallbacks matching a 20-LED strip on an 8 MHz bus
    let led_count = env_or_default("WS2812_LED_COUNT", "20");
    let reset_len = env_or_default("WS2812_RESET_LEN", "60");
    let timeout_ms = env_or_default("WS2812_TIMEOUT_MS", "500");
    let spi_hz = env_or_default("WS2812_SPI_HZ", "8_000_000");

    assert!(
        led_count.trim().trim_start_matches(['0', '_']) != "",
        "WS2812_LED_COUNT must be at least 1, got {led_count:?}"
    );

    // 4) Expose as compile-time constants
    println!("cargo:rustc-env=WS2812_LED_COUNT={}", led_count.trim());
    println!("cargo:rustc-env=WS2812_RESET_LEN={}", reset_len.trim());
    println!("cargo:rustc-env=WS2812_TIMEOUT_MS={}", timeout_ms.trim());
    println!("cargo:rustc-env=WS2812_SPI_HZ={}", spi_hz.trim());

    // Optional: don't rebuild unless these change
    println!("cargo:rerun-if-env-changed=WS2812_LED_COUNT");
    println!("cargo:rerun-if-env-changed=WS2812_RESET_LEN");
    println!("cargo:rerun-if-env-changed=WS2812_TIMEOUT_MS");
    println!("cargo:rerun-if-env-changed=WS2812_SPI_HZ");
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=build.rs");
}

fn load_home_env(file: &str) {
    let home = match env::var_os("USERPROFILE").or_else(|| env::var_os("HOME")) {
        Some(path) => PathBuf::from(path),
        None => return,
    };
    let path = home.join(file);
    let _ = dotenvy::from_path(&path);
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
