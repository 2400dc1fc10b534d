//! Library API integration tests
use lawdispatch_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn load_config() -> Config {
    let src = std::fs::read_to_string(get_fixture_path("config.toml")).unwrap();
    Config::from_toml_str(&src).unwrap()
}

const EXPECTED_LAW: &str = concat!(
    "[align=center][b]THE PUBLIC ORDER ACT[/b]\n\n[i]An act to keep the peace[/i][/align]\n\n",
    "[b][anchor=aI][/anchor]Article I.\u{a0}General Provisions[/b]\n",
    "[anchor=aI_s1][/anchor]Section 1.\u{a0}This act applies to every region member.\n",
    "[anchor=aI_s1_a][/anchor](a) including residents;\n",
    "[anchor=aI_s1_b][/anchor](b) including visitors.\n",
    "[anchor=aI_s2][/anchor]Section 2. Definitions.\n\n",
    "[b][anchor=aII][/anchor]Article II. Offences[/b]\n",
    "[anchor=aII_s1][/anchor]Section 1. Spamming is prohibited.\n\n",
    "[list][*]flooding[*]advertising[/list]\n\n",
);

#[test]
fn test_render_law_page() {
    let config = load_config();
    let html = std::fs::read_to_string(get_fixture_path("law_page.html")).unwrap();
    let mut anchors = AnchorGenerator::new(&config.anchor_lookup).unwrap();

    let bb = render_bbcode(&html, &config.bb_lookup, &mut anchors).unwrap();

    assert_eq!(bb, EXPECTED_LAW);
    assert!(!bb.contains("Signed, the Speaker"));
    assert!(!bb.contains("Board index"));
}

#[test]
fn test_render_and_embed() {
    let config = load_config();
    let html = std::fs::read_to_string(get_fixture_path("law_page.html")).unwrap();
    let renderer = BbRenderer::new(&config.bb_lookup).unwrap();
    let mut anchors = AnchorGenerator::new(&config.anchor_lookup).unwrap();

    let bb = renderer.render(&html, &mut anchors).unwrap();
    let text = embed_template(&bb, std::path::Path::new(&get_fixture_path("template.txt"))).unwrap();

    assert!(text.starts_with("{% extends \"law_base.txt\" %}\n{% block body %}\n[align=center]"));
    assert!(text.ends_with("[/list]\n\n\n{% endblock %}\n"));
    assert!(!text.contains(LAW_TEXT_PLACEHOLDER));
}

#[test]
fn test_reused_generator_leaks_state() {
    let config = load_config();
    let html = r#"<div class="content">Section 4. Late</div>"#;

    let mut reused = AnchorGenerator::new(&config.anchor_lookup).unwrap();
    reused.classify("Article IX. Earlier law");
    let leaked = render_bbcode(html, &config.bb_lookup, &mut reused).unwrap();
    assert!(leaked.starts_with("[anchor=aIX_s4]"));

    reused.reset();
    let fresh = render_bbcode(html, &config.bb_lookup, &mut reused).unwrap();
    assert!(fresh.starts_with("[anchor=_s4]"));
}

#[test]
fn test_plain_render_has_no_anchors() {
    let config = load_config();
    let html = std::fs::read_to_string(get_fixture_path("law_page.html")).unwrap();

    let bb = render_bbcode(&html, &config.bb_lookup, &mut NoAnchors).unwrap();

    assert!(!bb.contains("[anchor="));
    assert!(bb.contains("[b]Article II. Offences[/b]"));
}

#[test]
fn test_missing_container_is_an_error() {
    let config = load_config();
    let result = render_bbcode("<html><body><p>moved</p></body></html>", &config.bb_lookup, &mut NoAnchors);

    assert!(matches!(result, Err(LawDispatchError::ContainerNotFound(_))));
}

#[test]
fn test_registry_api() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("dispatch_config.toml");
    let config = load_config();

    update_dispatch_registry(&path, "laws/", &config.laws, "testopia", "meta", "reference").unwrap();

    let registry = DispatchRegistry::load(&path).unwrap();
    let entry = &registry.owner("testopia").unwrap()["laws/public_order_act"];
    assert_eq!(entry.title, "The Public Order Act");
    assert_eq!(entry.ns_id, None);
}
