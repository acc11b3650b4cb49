//! 终端前端
//!
//! 用终端交互复刻考试页面的三种互斥视图：
//! 锁定（只读历史）/ 答题表单 / 评分结果。
//! 面向用户的文案沿用产品的西班牙语。

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::warn;

use crate::clients::LmsClient;
use crate::config::Config;
use crate::error::ConfigError;
use crate::models::AttemptHistoryEntry;
use crate::services::{decode_identity, CertificateStatus};
use crate::utils::logging::truncate_text;
use crate::workflow::{ExamSession, SessionState};

/// 应用主结构
pub struct App {
    config: Config,
    client: LmsClient,
    user_id: Option<u64>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        if config.bearer_token.is_empty() {
            return Err(ConfigError::MissingToken.into());
        }

        let client = LmsClient::new(&config)?;

        // 仅作界面提示用途的解码，不构成信任边界
        let identity = decode_identity(&config.bearer_token);
        if identity.is_none() {
            warn!("⚠️ 无法从凭证解码用户身份，通过考试后将跳过证书签发");
        }
        let user_id = identity.map(|u| u.id);

        Ok(Self {
            config,
            client,
            user_id,
        })
    }

    /// 运行一次完整的考试会话
    pub async fn run(&self) -> Result<()> {
        println!("Cargando...");

        let mut session =
            match ExamSession::load(&self.client, self.config.exam_id, self.user_id).await {
                Ok(session) => session,
                Err(e) => {
                    warn!("❌ 考试加载失败: {}", e);
                    println!("No se pudo cargar el examen");
                    return Ok(());
                }
            };

        println!("\n=== {} ===", session.exam().name);
        render_history(session.history());

        if session.state() == SessionState::Locked {
            println!("Ya aprobaste este examen. No es posible volver a rendirlo.");
            return Ok(());
        }

        // 答题 → 确认 → 提交，失败或取消都回到表单
        loop {
            self.collect_answers(&mut session)?;
            session.request_submit()?;

            println!(
                "\n¿Enviar el examen? ({}/{} preguntas respondidas) [s/n]",
                session.selection().answered_count(),
                session.exam().questions.len()
            );
            if !read_yes_no()? {
                session.cancel_submit()?;
                println!("Envío cancelado. Puedes revisar tus respuestas.\n");
                continue;
            }

            match session.confirm_submit(&self.client).await {
                Ok(_) => break,
                Err(e) => {
                    warn!("⚠️ 提交失败: {}", e);
                    println!("No se pudo enviar el examen. Tus respuestas se conservan, puedes reintentar.\n");
                }
            }
        }

        render_result(&session);
        Ok(())
    }

    /// 逐题采集选择；回车保持当前选择（或保持未作答）
    fn collect_answers(&self, session: &mut ExamSession) -> Result<()> {
        let questions = session.exam().questions.clone();

        for question in &questions {
            if self.config.verbose_logging {
                tracing::debug!("渲染题目: {}", truncate_text(&question.text, 80));
            }

            println!("\n{}", question.text);
            for (i, answer) in question.answers.iter().enumerate() {
                let marker = if session.selection().get(question.id) == Some(answer.id) {
                    "●"
                } else {
                    "○"
                };
                println!("  {} {}. {}", marker, i + 1, answer.text);
            }

            loop {
                print!("Respuesta (Enter = mantener): ");
                io::stdout().flush().context("无法刷新标准输出")?;
                let line = read_line()?;
                let line = line.trim();
                if line.is_empty() {
                    break;
                }

                let Ok(index) = line.parse::<usize>() else {
                    println!("Opción inválida.");
                    continue;
                };
                let Some(answer) = index.checked_sub(1).and_then(|i| question.answers.get(i))
                else {
                    println!("Opción inválida.");
                    continue;
                };

                session.select_answer(question.id, answer.id)?;
                break;
            }
        }

        Ok(())
    }
}

/// 渲染历史作答表格（仅在有记录时）
fn render_history(history: &[AttemptHistoryEntry]) {
    if history.is_empty() {
        return;
    }

    println!("\nHistorial de intentos:");
    println!("{:<22}{:>10}{:>12}", "Fecha", "Puntaje", "Aprobado");
    for entry in history {
        println!(
            "{:<22}{:>9}%{:>12}",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.score,
            if entry.approved { "Sí" } else { "No" }
        );
    }
}

/// 渲染评分结果、逐题明细与证书提示
fn render_result(session: &ExamSession) {
    let Some(result) = session.result() else {
        return;
    };

    println!("\nResultado:");
    println!("Correctas: {} de {}", result.correct, result.total);
    println!("Porcentaje: {}%", result.percentage);
    println!("{}", if result.approved { "¡Aprobado!" } else { "No aprobado" });

    for detail in &result.detail {
        let mark = if detail.is_correct { "✔" } else { "✘" };
        let chosen = detail.selected_answer.as_deref().unwrap_or("(sin responder)");
        println!("  {} {} — elegiste: {}", mark, detail.question_text, chosen);
        if !detail.is_correct {
            if let Some(correct) = &detail.correct_answer {
                println!("      correcta: {}", correct);
            }
        }
    }

    match session.certificate_status() {
        Some(CertificateStatus::Issued) => {
            println!("\nCertificado emitido. Puedes descargarlo desde tus cursos.");
        }
        Some(CertificateStatus::Failed(_)) | Some(CertificateStatus::Skipped(_)) => {
            println!("\nAprobaste, pero no se pudo emitir el certificado. Intenta generarlo desde tus cursos.");
        }
        None => {}
    }
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("无法读取标准输入")?;
    Ok(line)
}

fn read_yes_no() -> Result<bool> {
    let line = read_line()?;
    Ok(matches!(line.trim(), "s" | "S" | "si" | "sí" | "y" | "Y"))
}
