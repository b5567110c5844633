//! Loads a few "profiles" one after another and prints every frame.
//!
//! `cargo run -p await_demo -- 1 0 42` (ids are optional; `0` fails).
//! Set `RUST_LOG=debug` to watch invocations start and slots get swept.

use std::cell::Cell;
use std::rc::Rc;
use std::task::Poll;

use anyhow::Context;
use awaitkit_core::*;
use awaitkit_ui::*;
use futures::executor::LocalPool;
use futures::future::poll_fn;

/// Gives up the executor once, scheduling this task to be polled again.
async fn yield_now() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            return Poll::Ready(());
        }
        yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    })
    .await
}

async fn fetch_profile(id: u64) -> anyhow::Result<String> {
    // pretend to wait on the network for a few polls
    for _ in 0..3 {
        yield_now().await;
    }
    if id == 0 {
        anyhow::bail!("no profile with id {id}");
    }
    Ok(format!("profile #{id}"))
}

fn app(user: u64) -> View {
    Column().child(Row().child(Text(format!("user {user}")))).child(
        Await(
            AwaitConfig::new(move || fetch_profile(user))
                .dependencies(deps![user])
                .then(|name: &String| Text(format!("loaded {name}")))
                .fail(|e| Text(format!("failed: {e}")))
                .meanwhile(Text("loading...")),
        ),
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ids = std::env::args()
        .skip(1)
        .map(|a| a.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .context("user ids must be non-negative integers")?;
    let ids = if ids.is_empty() { vec![1, 0, 42] } else { ids };

    let mut pool = LocalPool::new();
    let mut scheduler = Scheduler::new(Rc::new(pool.spawner()));
    let frames = Rc::new(Cell::new(0u32));
    let f = frames.clone();
    scheduler.recomposer().set_waker(move || f.set(f.get() + 1));

    for id in ids {
        let frame = scheduler.compose(|| app(id));
        println!("[{}] {}", frame.composition, frame.root);

        pool.run_until_stalled();
        while scheduler.needs_recompose() {
            let frame = scheduler.compose(|| app(id));
            println!("[{}] {}", frame.composition, frame.root);
            pool.run_until_stalled();
        }
    }

    log::info!("{} re-evaluations requested", frames.get());
    scheduler.dispose();
    Ok(())
}
