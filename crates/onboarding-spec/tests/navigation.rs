use serde_json::json;

use onboarding_spec::{
    Catalog, DepartmentId, EntryMode, Navigator, NextOutcome, Step, WeeklySchedule,
};

fn fixture() -> Catalog {
    Catalog::from_json(include_str!("../tests/fixtures/departments.json")).expect("catalog")
}

fn visible_ids<'a>(navigator: &'a Navigator<'a>) -> Vec<&'a str> {
    navigator
        .visible()
        .iter()
        .map(|question| question.id.as_str())
        .collect()
}

#[test]
fn full_flow_reaches_success() {
    let catalog = fixture();
    let mut navigator = Navigator::new(&catalog);
    assert_eq!(navigator.step(), Step::CompanyName);

    assert_eq!(navigator.next(), NextOutcome::Blocked);
    assert_eq!(navigator.error(), Some("Enter the company name"));

    navigator.set_company_name("Proxxima Telecom");
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.step(), Step::DepartmentSelect);

    assert_eq!(navigator.next(), NextOutcome::Blocked);
    assert_eq!(navigator.error(), Some("Select a department"));

    navigator.select_department(DepartmentId::Suporte);
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.step(), Step::Questions);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("descricao_suporte")
    );

    // Required question blocks until answered; answering clears the error.
    assert_eq!(navigator.next(), NextOutcome::Blocked);
    assert_eq!(navigator.error(), Some("This field is required"));
    navigator.set_answer("descricao_suporte", json!("Suporte via chat e telefone"));
    assert_eq!(navigator.error(), None);
    assert_eq!(navigator.next(), NextOutcome::Moved);

    navigator.set_answer("usa_ticket", json!("nao"));
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("obs_suporte")
    );
    assert!(navigator.is_last_question());
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.step(), Step::Review);

    assert_eq!(navigator.next(), NextOutcome::Blocked);
    assert_eq!(navigator.error(), Some("Enter your name"));
    navigator.set_submitter_name("Maria");
    assert_eq!(navigator.next(), NextOutcome::ReadyToSubmit);
    assert_eq!(navigator.step(), Step::Review);

    navigator.finish();
    assert_eq!(navigator.step(), Step::Success);
}

#[test]
fn conditional_answers_reshape_the_sequence() {
    let catalog = fixture();
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::Suporte);
    assert_eq!(navigator.mode(), EntryMode::TokenLink);
    assert_eq!(
        visible_ids(&navigator),
        vec!["descricao_suporte", "usa_ticket", "obs_suporte"]
    );

    navigator.set_answer("usa_ticket", json!("sim"));
    assert_eq!(
        visible_ids(&navigator),
        vec!["descricao_suporte", "usa_ticket", "link_ticket"]
    );

    navigator.set_answer("usa_ticket", json!("nao"));
    assert_eq!(
        visible_ids(&navigator),
        vec!["descricao_suporte", "usa_ticket", "obs_suporte"]
    );
}

#[test]
fn shrinking_the_sequence_reclamps_the_index() {
    let catalog = fixture();
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::SacGeral);

    navigator.set_answer("empresa_site", json!("https://acme.example"));
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.next(), NextOutcome::Moved); // portal_cliente is optional
    navigator.set_answer("canais_atendimento", json!({ "selected": ["email"], "otherText": "" }));
    // canal_preferido stays hidden without whatsapp or telefone, so this next
    // crosses into the horarios section.
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("horario_atendimento")
    );
    // Landing on a schedule question commits the default schedule.
    assert_eq!(
        navigator.answers()["horario_atendimento"],
        WeeklySchedule::default().to_value()
    );

    assert_eq!(navigator.next(), NextOutcome::Moved);
    navigator.set_answer("tem_plantao", json!("sim"));
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("horario_plantao")
    );

    // Flipping the gate hides the current question; the index re-clamps onto
    // the new last visible question instead of dangling.
    navigator.set_answer("tem_plantao", json!("nao"));
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("tem_plantao")
    );
}

#[test]
fn back_lands_on_the_recomputed_last_visible_question() {
    let catalog = fixture();
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::SacGeral);

    navigator.set_answer("empresa_site", json!("https://acme.example"));
    navigator.set_answer("canais_atendimento", json!({ "selected": ["email"], "otherText": "" }));
    for _ in 0..3 {
        assert_eq!(navigator.next(), NextOutcome::Moved);
    }
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("horario_atendimento")
    );

    // canal_preferido is hidden, so the previous section's last visible
    // question is the multi-select.
    navigator.previous();
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("canais_atendimento")
    );

    // Selecting whatsapp reveals canal_preferido right after it.
    navigator.set_answer(
        "canais_atendimento",
        json!({ "selected": ["email", "whatsapp"], "otherText": "" }),
    );
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("canal_preferido")
    );
}

#[test]
fn token_link_sessions_cannot_back_out_of_questions() {
    let catalog = fixture();
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::Vendas);
    assert!(navigator.is_first_question());

    navigator.previous();
    assert_eq!(navigator.step(), Step::Questions);
    assert!(navigator.is_first_question());
}

#[test]
fn full_mode_backs_out_to_department_selection() {
    let catalog = fixture();
    let mut navigator = Navigator::new(&catalog);
    navigator.set_company_name("Acme");
    assert_eq!(navigator.next(), NextOutcome::Moved);
    navigator.select_department(DepartmentId::Vendas);
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.step(), Step::Questions);

    navigator.previous();
    assert_eq!(navigator.step(), Step::DepartmentSelect);
    navigator.previous();
    assert_eq!(navigator.step(), Step::CompanyName);
}

#[test]
fn progress_counts_only_visible_questions() {
    let catalog = fixture();
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::Vendas);

    // plano_outro_detalhe is hidden; the info question counts as answered.
    let progress = navigator.progress();
    assert_eq!(progress.total, 2);
    assert_eq!(progress.answered, 1);
    assert_eq!(progress.percentage(), 50.0);

    navigator.set_answer("planos", json!({ "selected": ["fibra", "outro"], "otherText": "" }));
    let progress = navigator.progress();
    assert_eq!(progress.total, 3);
    assert_eq!(progress.answered, 2);
}

#[test]
fn progress_without_a_department_is_exactly_zero() {
    let catalog = fixture();
    let navigator = Navigator::new(&catalog);
    let progress = navigator.progress();
    assert_eq!(progress.total, 0);
    assert_eq!(progress.answered, 0);
    assert_eq!(progress.percentage(), 0.0);
}

#[test]
fn fully_hidden_sections_are_skipped_in_both_directions() {
    let raw = json!({
        "departments": [{
            "id": "suporte",
            "name": "Suporte",
            "sections": [
                {
                    "key": "a",
                    "title": "A",
                    "questions": [{
                        "id": "gate",
                        "prompt": "?",
                        "type": "single-select",
                        "required": true,
                        "options": [
                            { "value": "sim", "label": "Sim" },
                            { "value": "nao", "label": "Não" }
                        ]
                    }]
                },
                {
                    "key": "b",
                    "title": "B",
                    "questions": [{
                        "id": "detalhe",
                        "prompt": "?",
                        "type": "short-text",
                        "condition": "gate == 'sim'"
                    }]
                },
                {
                    "key": "c",
                    "title": "C",
                    "questions": [{ "id": "final", "prompt": "?", "type": "short-text" }]
                }
            ]
        }]
    });
    let catalog = Catalog::from_json(&raw.to_string()).expect("catalog");
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::Suporte);

    navigator.set_answer("gate", json!("nao"));
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("final")
    );

    navigator.previous();
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("gate")
    );
}

#[test]
fn empty_multi_select_blocks_next_until_something_is_picked() {
    let catalog = fixture();
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::Vendas);

    navigator.set_answer("planos", json!({ "selected": [], "otherText": "" }));
    assert_eq!(navigator.next(), NextOutcome::Blocked);
    assert_eq!(navigator.error(), Some("Select at least one option"));

    navigator.set_answer("planos", json!({ "selected": ["radio"], "otherText": "" }));
    assert_eq!(navigator.error(), None);
    assert_eq!(navigator.next(), NextOutcome::Moved);
}

#[test]
fn back_stays_put_when_every_earlier_section_is_hidden() {
    let raw = json!({
        "departments": [{
            "id": "suporte",
            "name": "Suporte",
            "sections": [
                {
                    "key": "a",
                    "title": "A",
                    "questions": [{
                        "id": "canal",
                        "prompt": "?",
                        "type": "short-text",
                        "condition": "modo != 'oculto'"
                    }]
                },
                {
                    "key": "b",
                    "title": "B",
                    "questions": [{
                        "id": "modo",
                        "prompt": "?",
                        "type": "single-select",
                        "required": true,
                        "options": [
                            { "value": "normal", "label": "Normal" },
                            { "value": "oculto", "label": "Oculto" }
                        ]
                    }]
                }
            ]
        }]
    });
    let catalog = Catalog::from_json(&raw.to_string()).expect("catalog");
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::Suporte);

    assert_eq!(navigator.next(), NextOutcome::Moved); // canal is optional
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("modo")
    );

    // Hiding the whole first section makes this the first visible question;
    // going back must keep a valid position, not land on the hidden section.
    navigator.set_answer("modo", json!("oculto"));
    assert!(navigator.is_first_question());
    navigator.previous();
    assert_eq!(navigator.step(), Step::Questions);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("modo")
    );
}

#[test]
fn full_mode_backs_out_past_hidden_leading_sections() {
    let raw = json!({
        "departments": [{
            "id": "suporte",
            "name": "Suporte",
            "sections": [
                {
                    "key": "a",
                    "title": "A",
                    "questions": [{
                        "id": "canal",
                        "prompt": "?",
                        "type": "short-text",
                        "condition": "modo != 'oculto'"
                    }]
                },
                {
                    "key": "b",
                    "title": "B",
                    "questions": [{ "id": "modo", "prompt": "?", "type": "short-text" }]
                }
            ]
        }]
    });
    let catalog = Catalog::from_json(&raw.to_string()).expect("catalog");
    let mut navigator = Navigator::new(&catalog);
    navigator.set_company_name("Acme");
    assert_eq!(navigator.next(), NextOutcome::Moved);
    navigator.select_department(DepartmentId::Suporte);
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.next(), NextOutcome::Moved);
    navigator.set_answer("modo", json!("oculto"));

    navigator.previous();
    assert_eq!(navigator.step(), Step::DepartmentSelect);
}

#[test]
fn review_back_returns_into_the_question_sequence() {
    let catalog = fixture();
    let mut navigator = Navigator::for_token_link(&catalog, "Acme", DepartmentId::Vendas);

    navigator.set_answer("planos", json!({ "selected": ["fibra"], "otherText": "" }));
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.next(), NextOutcome::Moved);
    assert_eq!(navigator.step(), Step::Review);

    navigator.previous();
    assert_eq!(navigator.step(), Step::Questions);
    assert_eq!(
        navigator.current_question().map(|q| q.id.as_str()),
        Some("tabela_precos")
    );
    assert!(navigator.is_last_question());
}

#[test]
fn reset_clears_the_session_back_to_department_selection() {
    let catalog = fixture();
    let mut navigator = Navigator::new(&catalog);
    navigator.set_company_name("Acme");
    assert_eq!(navigator.next(), NextOutcome::Moved);
    navigator.select_department(DepartmentId::Vendas);
    assert_eq!(navigator.next(), NextOutcome::Moved);
    navigator.set_answer("planos", json!({ "selected": ["fibra"], "otherText": "" }));

    navigator.reset();
    assert_eq!(navigator.step(), Step::DepartmentSelect);
    assert!(navigator.answers().is_empty());
    assert!(navigator.state().company_name.is_empty());
    assert_eq!(navigator.department(), None);
}
