use investment_report_builder::*;
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "이름,계좌번호,팀,거래금액,거래빈도,분산투자,안정성_점수,해외비중,AVG(수익률),OPS(활동성),ERA(안정성),종목1,종목1 수익률,종목2,종목2 수익률,종목3,종목3 수익률";

fn write_registry(name: &str, rows: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "report_integration_{}_{}.csv",
        name,
        std::process::id()
    ));
    fs::write(&path, format!("{}\n{}", HEADER, rows)).unwrap();
    path
}

#[tokio::test]
async fn test_full_report_flow() {
    let path = write_registry(
        "flow",
        "Kim MinJae,123456789012,KIA 타이거즈,92,41,55,70,33,0.325,0.980,2.45,삼성전자,12.5,NAVER,8.2,카카오,3.1\n",
    );
    let registry = Registry::new(&path);
    let mut session = SessionState::new();

    // Step 1: valid credentials advance to the report step with the full
    // derived profile.
    let profile = session
        .submit_identity(&registry, "Kim MinJae", "123456789012")
        .unwrap();
    assert_eq!(profile.jersey_number, "12");
    assert_eq!(profile.team, "KIA 타이거즈");
    assert_eq!(profile.position, Position::LegendSlugger);
    assert_eq!(session.step(), Step::Report);

    // Step 2: the renderer runs once and sees a prompt with the player's
    // identity embedded.
    let calls = Cell::new(0u32);
    let first = session
        .ensure_report(|prompt| {
            calls.set(calls.get() + 1);
            assert!(prompt.contains("Kim MinJae"));
            assert!(prompt.contains("KIA 타이거즈"));
            assert!(prompt.contains("초공격형 레전드 슬러거"));
            assert!(prompt.contains("Number **\"12\"**"));
            async { vec![0xAB, 0xCD] }
        })
        .await
        .unwrap()
        .to_vec();

    // Re-entering the report step, even after going back and resubmitting,
    // reuses the cached bytes instead of calling the remote service again.
    session.back();
    session
        .submit_identity(&registry, "Kim MinJae", "123456789012")
        .unwrap();
    let second = session
        .ensure_report(|_| {
            calls.set(calls.get() + 1);
            async { vec![0xFF] }
        })
        .await
        .unwrap()
        .to_vec();

    assert_eq!(calls.get(), 1);
    assert_eq!(first, second);

    fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_unknown_player_keeps_session_in_identity_step() {
    let path = write_registry("unknown", "Someone Else,999999999999,,,,,,,,,,,,,,,\n");
    let registry = Registry::new(&path);
    let mut session = SessionState::new();

    let err = session
        .submit_identity(&registry, "Kim MinJae", "123456789012")
        .unwrap_err();
    assert!(matches!(err, ReportBuilderError::NotFound));
    assert_eq!(session.step(), Step::Identity);

    // The report step is unreachable without a successful lookup.
    let err = session
        .ensure_report(|_| async { Vec::new() })
        .await
        .unwrap_err();
    assert!(matches!(err, ReportBuilderError::NoActivePlayer));

    fs::remove_file(path).ok();
}

#[test]
fn test_short_account_is_rejected_without_touching_storage() {
    // The registry path does not exist; validation must fail first.
    let registry = Registry::new("/no/such/registry.csv");
    let mut session = SessionState::new();

    let err = session
        .submit_identity(&registry, "Kim MinJae", "12345")
        .unwrap_err();
    assert!(matches!(err, ReportBuilderError::InvalidIdentity(_)));
    assert_eq!(session.step(), Step::Identity);
}

#[test]
fn test_hyphenated_storage_matches_plain_query() {
    let path = write_registry("hyphen", "Lee Jung,1234-5678-9012,한화 이글스,,,,,,,,,,,,,,\n");
    let registry = Registry::new(&path);

    let record = registry.find_record("Lee Jung", "123456789012").unwrap();
    assert_eq!(record.account_number, "123456789012");
    assert_eq!(record.team.as_deref(), Some("한화 이글스"));

    fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_reset_returns_session_to_defaults() {
    let path = write_registry("reset", "Kim MinJae,123456789012,,90,10,20,30,40,,,,,,,,,\n");
    let registry = Registry::new(&path);
    let mut session = SessionState::new();

    session
        .submit_identity(&registry, "Kim MinJae", "123456789012")
        .unwrap();
    session.ensure_report(|_| async { vec![1, 2, 3] }).await.unwrap();

    let session = session.reset();
    assert_eq!(session.step(), Step::Identity);
    assert!(session.profile().is_none());
    assert!(session.report_image().is_none());

    fs::remove_file(path).ok();
}

#[test]
fn test_blank_team_falls_back_to_default() {
    let path = write_registry("team", "Park,111122223333, ,5,,,,,,,,,,,,,\n");
    let registry = Registry::new(&path);
    let mut session = SessionState::new();

    let profile = session
        .submit_identity(&registry, "Park", "111122223333")
        .unwrap();
    assert_eq!(profile.team, DEFAULT_TEAM);

    fs::remove_file(path).ok();
}

#[cfg(feature = "gemini")]
mod gemini {
    use super::*;

    #[tokio::test]
    async fn test_degraded_outcome_still_yields_downloadable_artifact() {
        let path = write_registry(
            "degraded",
            "Kim MinJae,123456789012,,90,10,20,30,40,,,,,,,,,\n",
        );
        let registry = Registry::new(&path);
        let mut session = SessionState::new();
        session
            .submit_identity(&registry, "Kim MinJae", "123456789012")
            .unwrap();

        // Stand in for an adapter whose remote call failed: it substitutes
        // the placeholder, and the session caches it like any other image.
        let bytes = session
            .ensure_report(|_| async { fallback_report_image() })
            .await
            .unwrap()
            .to_vec();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), FALLBACK_WIDTH);
        assert_eq!(decoded.height(), FALLBACK_HEIGHT);

        fs::remove_file(path).ok();
    }
}
