use pagecue_cli::sim::{simulate, SimBrowser, Simulation};
use pagecue_config::Config;
use pagecue_core::{AppMode, PromptRegistry, RuntimeBus, RuntimeMessage};
use pagecue_panel::PanelView;
use std::sync::Arc;
use std::time::Duration;

const LEETCODE: &str = "https://leetcode.com/problems/two-sum";
const YOUTUBE: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn registry() -> Arc<PromptRegistry> {
    Arc::new(PromptRegistry::builtin())
}

async fn start(urls: &[&str]) -> Simulation {
    let registry = registry();
    let browser = SimBrowser::new(registry.clone(), Config::default().toast);
    for (i, url) in urls.iter().enumerate() {
        browser.open_tab(url, i == 0).unwrap();
    }
    let sim = Simulation::start(browser, registry, Config::default()).await;
    sim.coordinator.startup().unwrap();
    tokio::time::sleep(sim.injection_wait()).await;
    sim
}

fn labels(sim: &Simulation, tab: i64) -> Vec<String> {
    sim.browser.visible_buttons(tab).into_iter().map(|a| a.label).collect()
}

#[tokio::test(start_paused = true)]
async fn test_simulate_click_fills_panel() {
    let urls = vec![
        LEETCODE.to_string(),
        "https://example.com".to_string(),
        "chrome://settings".to_string(),
    ];
    let report = simulate(&urls, true, registry(), Config::default()).await.unwrap();

    assert_eq!(report.tabs.len(), 3);
    assert!(report.tabs[0].script_loaded);
    assert!(report.tabs[1].script_loaded);
    assert!(report.tabs[1].labels.is_empty());
    assert!(!report.tabs[2].script_loaded);

    assert_eq!(report.clicked.as_deref(), Some("Fix my code to pass all test cases 🔧"));
    assert_eq!(report.panel_mode, AppMode::Agent);
    assert_eq!(report.panel_input.as_deref(), Some("Fix my code to pass all test cases 🔧"));
    assert_eq!(report.task.as_deref(), Some("Fix my code to pass all test cases"));
}

#[tokio::test(start_paused = true)]
async fn test_clicked_prompt_reaches_panel_exactly_once() {
    let sim = start(&[YOUTUBE]).await;
    assert_eq!(labels(&sim, 1), vec!["Summarize📝", "Takeaways🔑"]);

    let clicked = sim.browser.click_first_button(1).unwrap();
    assert_eq!(clicked.as_deref(), Some("Summarize video 📝"));
    tokio::time::sleep(sim.fill_wait()).await;

    assert_eq!(sim.panel.app_mode(), AppMode::Agent);
    assert_eq!(sim.panel.inputs(), vec!["Summarize video 📝"]);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(sim.panel.inputs().len(), 1);
    assert!(!sim.panel.is_highlighted());
    sim.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_navigation_reinjects_script() {
    let sim = start(&[LEETCODE]).await;
    assert_eq!(labels(&sim, 1), vec!["Fix🔧", "Write📝"]);

    sim.navigate(1, "https://example.com/").unwrap();
    assert!(!sim.browser.has_script(1));

    tokio::time::sleep(sim.injection_wait()).await;
    assert!(sim.browser.has_script(1));
    assert!(labels(&sim, 1).is_empty());

    // Single-page-app route change, picked up by the poll.
    sim.browser.push_state(1, YOUTUBE).unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(labels(&sim, 1), vec!["Summarize📝", "Takeaways🔑"]);
    sim.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_hide_request_clears_active_tab() {
    let sim = start(&[LEETCODE, YOUTUBE]).await;
    assert!(!labels(&sim, 1).is_empty());
    assert!(!labels(&sim, 2).is_empty());

    sim.browser
        .bus()
        .send(RuntimeMessage::HidePromptToast.to_value())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(350)).await;

    assert_eq!(sim.browser.overlay(1).unwrap().container_count(), 0);
    assert!(!labels(&sim, 2).is_empty());
    sim.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_closed_tab_is_forgotten() {
    let sim = start(&[LEETCODE]).await;
    sim.close_tab(1).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!sim.browser.has_script(1));
    assert!(sim.browser.overlay(1).is_none());
    sim.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_blocked_scripts_show_nothing() {
    let registry = registry();
    let browser =
        SimBrowser::new(registry.clone(), Config::default().toast).with_blocked_scripts();
    browser.open_tab(LEETCODE, true).unwrap();
    let sim = Simulation::start(browser, registry, Config::default()).await;
    sim.coordinator.startup().unwrap();
    tokio::time::sleep(sim.injection_wait()).await;

    assert!(!sim.browser.has_script(1));
    assert!(labels(&sim, 1).is_empty());
    sim.shutdown();
}
