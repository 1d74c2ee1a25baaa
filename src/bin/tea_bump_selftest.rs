use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use tea_bump::{
    align::align_up, AllocatorConfig, BumpAllocator, FixedArena, StackAllocator,
    ValidationMode, DEFAULT_ALIGN,
};

const KILOBYTE: usize = 1024;

#[derive(Parser)]
#[command(name = "tea_bump_selftest", version, about = "Checks the arena and stack allocators")]
struct Cli {
    /// Skip invariant checks instead of panicking on them
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Alignment of misaligned addresses to 1, 2, 4 and 8 bytes
    Align,
    /// 1KB, 15KB and 32KB pushes fit, a further 56KB push does not
    Arena {
        #[arg(short, long, default_value_t = 64 * KILOBYTE)]
        capacity: usize,
    },
    /// Push two arrays, pop the second
    Stack {
        #[arg(short, long, default_value_t = 4 * KILOBYTE)]
        capacity: usize,
    },
    /// Everything above with default sizes
    All,
}

#[derive(Default)]
struct Report {
    failures: usize,
}

impl Report {
    fn check(&mut self, name: &str, passed: bool) {
        if passed {
            println!("  ok      {name}");
        } else {
            println!("  FAILED  {name}");
            self.failures += 1;
        }
    }
}

fn check_align(report: &mut Report) {
    println!("align_up");
    let bytes = [0u8; 512];
    let base = bytes.as_ptr() as usize;
    let cases: [(usize, &[usize]); 4] = [
        (1, &[0, 1]),
        (2, &[1, 3, 4]),
        (4, &[1, 3, 4]),
        (8, &[0, 3, 5, 6]),
    ];
    for (alignment, starts) in cases {
        for &start in starts {
            let address = base + start;
            let aligned = align_up(address, alignment);
            report.check(
                &format!("base+{start} to {alignment}"),
                aligned % alignment == 0 && aligned >= address && aligned - address < alignment,
            );
        }
    }
    report.check("base(8)+3 to 8 is base+8", align_up(0x1000 + 3, 8) == 0x1000 + 8);
}

fn check_arena(report: &mut Report, config: AllocatorConfig) {
    println!("arena ({} bytes)", config.capacity);
    let mut arena = match FixedArena::with_config(config) {
        Ok(arena) => arena,
        Err(err) => {
            report.check(&format!("create: {err}"), false);
            return;
        }
    };

    report.check("7 x 3 bytes aligned to 4", {
        let array = arena.alloc_raw(7, 3, 4);
        array.is_ok_and(|bytes| bytes.len() == 21 && bytes.as_ptr() as usize % 4 == 0)
    });
    arena.reset();

    let mut expected = 0;
    for size in [KILOBYTE, 15 * KILOBYTE, 32 * KILOBYTE] {
        let fits = expected + size <= arena.capacity();
        if fits {
            expected += size;
        }
        report.check(
            &format!("push {size} bytes {}", if fits { "fits" } else { "rejected" }),
            arena.alloc_default_aligned(size).is_ok() == fits && arena.used() == expected,
        );
    }

    let size = 56 * KILOBYTE;
    let fits = expected + size <= arena.capacity();
    report.check(
        &format!("push {size} bytes {}", if fits { "fits" } else { "rejected" }),
        arena.alloc_default_aligned(size).is_ok() == fits,
    );

    arena.reset();
    report.check("reset", arena.used() == 0);
    arena.free();
}

fn check_stack(report: &mut Report, config: AllocatorConfig) {
    println!("stack ({} bytes)", config.capacity);
    let mut stack = match StackAllocator::with_config(config) {
        Ok(stack) => stack,
        Err(err) => {
            report.check(&format!("create: {err}"), false);
            return;
        }
    };

    let array_a = std::mem::size_of::<i32>() * 8;
    let array_b = std::mem::size_of::<f32>() * 16;
    report.check("push array a", stack.alloc_aligned(array_a, DEFAULT_ALIGN).is_ok());
    let before = stack.used();
    report.check("push array b", stack.alloc_aligned(array_b, DEFAULT_ALIGN).is_ok());
    report.check(
        "pop array b",
        stack.pop(array_b).is_ok() && stack.used() == before,
    );
    report.check(
        "pop past the offset is rejected",
        stack.pop(before + 1).is_err() && stack.used() == before,
    );
    stack.free();
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let validation = if cli.fast {
        ValidationMode::Fast
    } else {
        ValidationMode::Strict
    };
    let config = |capacity| {
        AllocatorConfig::new(capacity)
            .with_validation(validation)
            .with_lifo_tracking(!cli.fast)
    };

    let mut report = Report::default();
    match cli.command.unwrap_or(Command::All) {
        Command::Align => check_align(&mut report),
        Command::Arena { capacity } => check_arena(&mut report, config(capacity)),
        Command::Stack { capacity } => check_stack(&mut report, config(capacity)),
        Command::All => {
            check_align(&mut report);
            check_arena(&mut report, config(64 * KILOBYTE));
            check_stack(&mut report, config(4 * KILOBYTE));
        }
    }

    info!("{} failed checks", report.failures);
    if report.failures == 0 {
        println!("all checks passed");
        ExitCode::SUCCESS
    } else {
        println!("{} checks failed", report.failures);
        ExitCode::FAILURE
    }
}
