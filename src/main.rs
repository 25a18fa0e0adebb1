/*!
 * PCB Kernel - Main Entry Point
 *
 * Boots the PCB subsystem from environment configuration, creates the
 * initial process and a few children, then dumps the process table.
 */

use miette::IntoDiagnostic;
use tracing::info;

use pcb_kernel::core::limits::{PRIO_HIGH, PRIO_LOW};
use pcb_kernel::{init_tracing, Context, KernelError, PcbConfig, PcbSubsystem, SpawnRequest};

fn main() -> miette::Result<()> {
    init_tracing();

    info!("PCB kernel starting...");

    let config = PcbConfig::from_env();
    config
        .validate()
        .map_err(|e| KernelError::Configuration(e.to_string()))?;
    info!(?config, "configuration loaded");

    let subsystem = PcbSubsystem::builder()
        .with_config(config)
        .try_build()
        .map_err(KernelError::from)?;
    let shared = subsystem.into_shared();

    {
        let mut pcbs = shared.lock();

        let init = pcbs
            .spawn(SpawnRequest::new(0).with_prio(PRIO_HIGH))
            .map_err(KernelError::from)?;
        pcbs.set_init_process(init).map_err(KernelError::from)?;
        let init_pid = pcbs.pcb(init).map(|pcb| pcb.pid).unwrap_or_default();
        info!(%init, pid = init_pid, "initial process created");

        for _ in 0..3 {
            pcbs.spawn(SpawnRequest::new(init_pid).with_prio(PRIO_LOW))
                .map_err(KernelError::from)?;
        }

        let mut console = String::new();
        pcbs.dump_pcb(&mut console, "init", Some(init))
            .map_err(KernelError::from)?;
        PcbSubsystem::dump_context(&mut console, "init context", Some((0, &Context::default())))
            .map_err(KernelError::from)?;
        let report = pcbs
            .dump_table(&mut console, Some("Active processes"), true)
            .map_err(KernelError::from)?;
        print!("{}", console);
        info!(used = report.used, empty = report.empty, "process table dumped");

        println!("{}", pcbs.snapshot().to_json().into_diagnostic()?);
    }

    let subsystem = match std::sync::Arc::try_unwrap(shared) {
        Ok(mutex) => mutex.into_inner(),
        Err(_) => return Err(KernelError::Internal("subsystem still shared".into()).into()),
    };
    let reclaimed = subsystem.shutdown();
    info!(reclaimed, "PCB kernel stopped");

    Ok(())
}
