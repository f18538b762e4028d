use dotenv::dotenv;
use investment_report_builder::{
    profile_summary, AppConfig, Registry, ReportBuilderError, ReportImageService, SessionState,
    Step,
};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    };

    let registry = Registry::new(&config.registry_path);
    let service = ReportImageService::from_config(&config);
    let mut session = SessionState::new();

    println!("⚾ YIPP X KBO AI 투자리포트");
    println!("------------------------------------------------------------------");

    loop {
        match session.step() {
            Step::Identity => {
                println!("\n① 내 선수 정보 입력 (type 'quit' to exit)");

                let name = read_line("이름")?;
                if name.eq_ignore_ascii_case("quit") {
                    break;
                }
                let account = read_line("YIPP 계좌번호 (12자리)")?;

                match session.submit_identity(&registry, &name, &account) {
                    Ok(profile) => {
                        println!("\n반갑습니다, {}님! 투자 데이터를 분석 중입니다...", profile.name);
                        println!("소속: {} | 포지션: {}", profile.team, profile.position);
                    }
                    Err(ReportBuilderError::InvalidIdentity(reason)) => {
                        println!("❌ {}", reason);
                    }
                    Err(ReportBuilderError::NotFound) => {
                        println!(
                            "등록되지 않은 선수입니다. YIPP 계좌 개설 후, 신인 선수 등록을 먼저 진행해주세요."
                        );
                    }
                    Err(err) => {
                        eprintln!("❌ {}", err);
                    }
                }
            }
            Step::Report => {
                let Some(profile) = session.profile() else {
                    session = session.reset();
                    continue;
                };
                let jersey_number = profile.jersey_number.clone();

                println!("\n📊 AI 투자 리포트");
                println!("{}", profile_summary(profile));

                if session.needs_report() {
                    println!("\n🎨 AI가 고객님의 투자 성향과 수익률이 담긴 투자리포트를 생성 중입니다...");
                }

                let warning = RefCell::new(None);
                let bytes = session
                    .ensure_report(|prompt| {
                        let service = &service;
                        let warning = &warning;
                        async move {
                            let outcome = service.generate_report_image(&prompt).await;
                            if let Some(err) = outcome.degraded {
                                *warning.borrow_mut() = Some(err.to_string());
                            }
                            outcome.bytes
                        }
                    })
                    .await?;

                if let Some(reason) = warning.borrow().as_deref() {
                    println!("⚠️ 이미지 생성 실패: {} (기본 이미지로 대체되었습니다)", reason);
                }

                let file_name = format!("yipp_report_{}.png", jersey_number);
                fs::write(&file_name, bytes)?;
                println!("✨ AI 투자리포트 생성 완료!");
                println!("📸 저장되었습니다: {}", file_name);

                loop {
                    let command = read_line("[back / reset / quit]")?;
                    match command.as_str() {
                        "back" => {
                            session.back();
                            break;
                        }
                        "reset" => {
                            session = session.reset();
                            break;
                        }
                        "quit" => return Ok(()),
                        _ => println!("back, reset, quit 중 하나를 입력해주세요."),
                    }
                }
            }
        }
    }

    Ok(())
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{} > ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
