use dmrlink_frame::Frame;
use dmrlink_link::{Link, LinkConfig, LinkHandle, RepeaterConfiguration};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cmd::{parse_duration, ConnectArgs};
use crate::exit::{io_error, link_error, CliResult, SUCCESS};
use crate::output::{print_frame, FrameOutput, OutputFormat};

pub fn run(args: ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let config = link_config(&args)?;
    let repeater = repeater_configuration(&args);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("failed to start runtime", err))?;
    runtime.block_on(connect(config, repeater, args.count, format))
}

fn link_config(args: &ConnectArgs) -> CliResult<LinkConfig> {
    Ok(LinkConfig::new(args.id, args.master.clone())
        .with_auth_key(args.auth_key.clone())
        .with_local(args.local.clone())
        .with_keepalive_interval(parse_duration(&args.keepalive)?)
        .with_login_timeout(Some(parse_duration(&args.login_timeout)?))
        .with_max_outstanding_pings(args.max_outstanding_pings))
}

fn repeater_configuration(args: &ConnectArgs) -> RepeaterConfiguration {
    RepeaterConfiguration {
        callsign: args.callsign.clone(),
        repeater_id: args.id,
        rx_freq: args.rx_freq,
        tx_freq: args.tx_freq,
        tx_power: args.tx_power,
        color_code: args.color_code,
        latitude: args.latitude,
        longitude: args.longitude,
        height: args.height,
        location: args.location.clone(),
        description: args.description.clone(),
        url: args.url.clone(),
        ..Default::default()
    }
}

async fn connect(
    config: LinkConfig,
    repeater: RepeaterConfiguration,
    count: Option<usize>,
    format: OutputFormat,
) -> CliResult<i32> {
    let (frames_tx, mut frames_rx) = mpsc::unbounded_channel::<Frame>();
    let handle = Link::new(config, repeater)
        .map_err(|err| link_error("invalid link configuration", err))?
        .with_handler(move |frame: &Frame| {
            let _ = frames_tx.send(*frame);
        })
        .start()
        .await
        .map_err(|err| link_error("failed to start link", err))?;

    let mut state = handle.subscribe();
    let mut printed = 0usize;
    let limit_reached = |printed: usize| count.is_some_and(|limit| printed >= limit);

    if limit_reached(printed) {
        return stop(handle).await;
    }

    loop {
        tokio::select! {
            frame = frames_rx.recv() => {
                let Some(frame) = frame else {
                    return finish(handle).await;
                };
                print_frame(&FrameOutput::new(&frame).received_now(), format);
                printed += 1;
                if limit_reached(printed) {
                    info!(frames = printed, "frame limit reached");
                    return stop(handle).await;
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    return finish(handle).await;
                }
                let current = *state.borrow_and_update();
                info!(state = %current, "link state changed");
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(error = %err, "failed to listen for interrupt");
                }
                info!("interrupted, closing link");
                return stop(handle).await;
            }
        }
    }
}

async fn stop(handle: LinkHandle) -> CliResult<i32> {
    handle
        .shutdown()
        .await
        .map_err(|err| link_error("link ended", err))?;
    Ok(SUCCESS)
}

async fn finish(handle: LinkHandle) -> CliResult<i32> {
    handle
        .wait()
        .await
        .map_err(|err| link_error("link ended", err))?;
    Ok(SUCCESS)
}
