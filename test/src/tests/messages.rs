use anyhow::ensure;
use libtest_mimic::Trial;

use crate::context::{ctx, run};

pub fn register() -> Vec<Trial> {
    vec![
        Trial::test("messages::update_round_trip", || {
            run(async {
                let accepted = ctx().client.update("Hello from the test suite").await?;
                ensure!(
                    accepted.message == "Message updated",
                    "unexpected response body: {}",
                    accepted.message
                );
                Ok(())
            })
        }),
        Trial::test("messages::update_reports_success_status", || {
            run(async {
                let resp = ctx()
                    .client
                    .update_raw(Some(("message", "status check")))
                    .await?;
                ensure!(
                    resp.status().as_u16() == 200,
                    "expected 200, got {}",
                    resp.status()
                );
                Ok(())
            })
        }),
        Trial::test("messages::update_with_spaces_and_punctuation", || {
            run(async {
                let accepted = ctx()
                    .client
                    .update("Meeting at 15:00 - room B, bring snacks!")
                    .await?;
                ensure!(accepted.message == "Message updated");
                Ok(())
            })
        }),
        Trial::test("messages::rapid_sequential_updates_all_accepted", || {
            run(async {
                // earlier values are superseded, never rejected
                for i in 0..5 {
                    let accepted = ctx().client.update(&format!("burst {i}")).await?;
                    ensure!(accepted.message == "Message updated");
                }
                Ok(())
            })
        }),
        Trial::test("messages::concurrent_updates_all_accepted", || {
            run(async {
                let client = &ctx().client;
                let (a, b, c, d) = tokio::join!(
                    client.update("racer one"),
                    client.update("racer two"),
                    client.update("racer three"),
                    client.update("racer four"),
                );
                for accepted in [a?, b?, c?, d?] {
                    ensure!(accepted.message == "Message updated");
                }
                Ok(())
            })
        }),
        Trial::test("messages::non_ascii_text_is_accepted_at_the_endpoint", || {
            run(async {
                // rendering failures happen asynchronously and are never
                // surfaced through the request that caused them
                let accepted = ctx().client.update("caf\u{e9} \u{2603}").await?;
                ensure!(accepted.message == "Message updated");
                // the daemon must still be serving afterwards
                ctx().client.update("recovery message").await?;
                Ok(())
            })
        }),
    ]
}
