//! 本地两段式翻译端到端测试

mod common;

use common::RecordingSink;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tt_rust::application::{ControllerSettings, QueryController};
use tt_rust::domain::model::ItemKind;
use tt_rust::infrastructure::config::{Config, LocalConfig};
use tt_rust::state::AppState;

fn write_model(dir: &Path, source: &str, target: &str, joiner: &str, table: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("config.json"),
        serde_json::json!({
            "source_language": source,
            "target_language": target,
            "joiner": joiner,
        })
        .to_string(),
    )
    .unwrap();
    fs::write(dir.join("lexicon.tsv"), table).unwrap();
}

fn local_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.debounce_ms = 20;
    config.min_query_chars = Some(1);
    config.backend.local = LocalConfig {
        source_to_english: root.join("opus_mul_en"),
        english_to_target: root.join("opus_en_zh"),
    };
    config
}

async fn wait_idle(controller: &QueryController) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while controller.is_loading() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("lookup did not settle");
}

#[tokio::test]
async fn test_local_models_translate_through_english() {
    let dir = tempfile::tempdir().unwrap();
    write_model(
        &dir.path().join("opus_mul_en"),
        "es",
        "en",
        " ",
        "hola\thello\nbuenos días\tgood morning\nmundo\tworld\n",
    );
    write_model(
        &dir.path().join("opus_en_zh"),
        "en",
        "zh",
        "",
        "hello\t你好\nworld\t世界\ngood morning\t早上好\n",
    );

    let state = AppState::new(local_config(dir.path())).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let controller = QueryController::new(
        state.build_backend().unwrap(),
        sink.clone(),
        ControllerSettings::from_config(&state.config),
    )
    .unwrap();

    controller.on_input_changed("", "Hola mundo");
    wait_idle(&controller).await;
    assert_eq!(sink.translations(), vec!["你好世界".to_string()]);

    controller.on_input_changed("Hola mundo", "buenos días");
    wait_idle(&controller).await;
    assert_eq!(sink.last_results().unwrap()[0].title, "早上好");
}

#[tokio::test]
async fn test_missing_models_degrade_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    write_model(&dir.path().join("opus_mul_en"), "es", "en", " ", "hola\thello\n");
    // opus_en_zh deliberately absent

    let state = AppState::new(local_config(dir.path())).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let controller = QueryController::from_backend(
        state.build_backend(),
        sink.clone(),
        ControllerSettings::from_config(&state.config),
    )
    .unwrap();

    assert!(controller.is_degraded());
    controller.on_input_changed("", "hola");
    let results = sink.last_results().unwrap();
    assert_eq!(results[0].kind, ItemKind::Diagnostic);
    assert!(results[0].title.contains("opus_en_zh"));
}
