use super::*;
use crate::cli::config::ProjectConfig;
use crate::cli::{EditArgs, MoveArgs, RemoveArgs};
use crate::domain::Section;
use crate::infra::{SECTIONS_DIR, SectionStore};
use anyhow::{Result, bail};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Test helpers

/// Prompter answering from a fixed script and recording the questions.
struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| format!("{}\n", a)).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front())
    }
}

/// Editor that records the paths it was asked to open.
#[derive(Default)]
struct RecordingEditor {
    opened: RefCell<Vec<PathBuf>>,
}

impl EditorLauncher for RecordingEditor {
    fn open(&self, path: &Path) -> Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

struct FailingEditor;

impl EditorLauncher for FailingEditor {
    fn open(&self, _path: &Path) -> Result<()> {
        bail!("editor 'false' exited with non-zero status")
    }
}

fn project(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doctor.toml"), "").unwrap();
    let secs = dir.path().join(SECTIONS_DIR);
    fs::create_dir(&secs).unwrap();
    for name in files {
        fs::write(secs.join(name), "").unwrap();
    }
    dir
}

fn on_disk(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path().join(SECTIONS_DIR))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn remove_args(sections: &[&str], confirm: bool) -> RemoveArgs {
    RemoveArgs {
        sections: sections.iter().map(|s| s.to_string()).collect(),
        confirm,
    }
}

// ===========================================
// choose / confirm tests
// ===========================================

#[test]
fn choose_retries_until_valid_answer() {
    let a = Section::new(PathBuf::from("00_Notes.md"), "Notes", 0);
    let b = Section::new(PathBuf::from("03_Notes.md"), "Notes", 3);
    let mut prompter = ScriptedPrompter::new(&["x", "9", "2"]);

    let chosen = choose(&[&a, &b], "Which one?", &mut prompter).unwrap();

    assert_eq!(chosen.map(|s| s.index()), Some(3));
    assert_eq!(prompter.asked.len(), 3);
}

#[test]
fn choose_quits_on_q_and_end_of_input() {
    let a = Section::new(PathBuf::from("00_Notes.md"), "Notes", 0);
    let b = Section::new(PathBuf::from("03_Notes.md"), "Notes", 3);

    let mut quitting = ScriptedPrompter::new(&["q"]);
    assert!(choose(&[&a, &b], "?", &mut quitting).unwrap().is_none());

    let mut silent = ScriptedPrompter::new(&[]);
    assert!(choose(&[&a, &b], "?", &mut silent).unwrap().is_none());
}

#[test]
fn confirm_accepts_only_y() {
    assert!(confirm("Sure?", &mut ScriptedPrompter::new(&["y"])).unwrap());
    assert!(confirm("Sure?", &mut ScriptedPrompter::new(&["Y"])).unwrap());
    assert!(!confirm("Sure?", &mut ScriptedPrompter::new(&["yes"])).unwrap());
    assert!(!confirm("Sure?", &mut ScriptedPrompter::new(&[""])).unwrap());
    assert!(!confirm("Sure?", &mut ScriptedPrompter::new(&[])).unwrap());
}

#[test]
fn confirm_shows_default_no() {
    let mut prompter = ScriptedPrompter::new(&["n"]);
    confirm("Delete it?", &mut prompter).unwrap();
    assert_eq!(prompter.asked, vec!["Delete it? (y/N)"]);
}

#[test]
fn resolve_section_skips_prompt_for_single_match() {
    let dir = project(&["00_A.md", "01_B.md"]);
    let store = SectionStore::open(dir.path()).unwrap();
    let mut prompter = ScriptedPrompter::new(&[]);

    let result = resolve_section(&store, "b", 0, "edit", &mut prompter).unwrap();

    assert!(matches!(result, ResolveResult::Found(s) if s.title() == "B"));
    assert!(prompter.asked.is_empty());
}

#[test]
fn resolve_section_asks_with_action() {
    let dir = project(&["00_Notes.md", "01_B.md", "02_Notes.md"]);
    let store = SectionStore::open(dir.path()).unwrap();
    let mut prompter = ScriptedPrompter::new(&["2"]);

    let result = resolve_section(&store, "notes", 0, "move", &mut prompter).unwrap();

    assert!(matches!(result, ResolveResult::Found(s) if s.index() == 2));
    assert_eq!(
        prompter.asked,
        vec!["Which one do you want to move? (q to quit)"]
    );
}

#[test]
fn resolve_section_reports_not_found() {
    let dir = project(&["00_A.md"]);
    let store = SectionStore::open(dir.path()).unwrap();
    let result = resolve_section(&store, "Z", 0, "edit", &mut ScriptedPrompter::new(&[])).unwrap();

    assert!(matches!(result, ResolveResult::NotFound(e) if e.query() == "Z"));
}

// ===========================================
// remove offset tests
// ===========================================

#[test]
fn index_offset_counts_removed_below_query() {
    assert_eq!(index_offset("3", &[]), 0);
    assert_eq!(index_offset("3", &[1]), 1);
    assert_eq!(index_offset("3", &[1, 2, 4]), 2);
    assert_eq!(index_offset("2", &[2]), 0);
}

#[test]
fn index_offset_ignores_titles() {
    assert_eq!(index_offset("Intro", &[0, 1]), 0);
    assert_eq!(index_offset("0", &[0]), 0);
}

#[test]
fn original_index_skips_removed_slots() {
    assert_eq!(original_index(1, &[]), 1);
    assert_eq!(original_index(1, &[1]), 2);
    assert_eq!(original_index(1, &[1, 2]), 3);
    assert_eq!(original_index(0, &[1, 2]), 0);
    assert_eq!(original_index(2, &[0, 4]), 3);
}

// ===========================================
// remove tests
// ===========================================

#[test]
fn remove_confirmed_section_renumbers_rest() {
    let dir = project(&["00_A.md", "01_B.md", "02_C.md"]);
    let mut prompter = ScriptedPrompter::new(&["y"]);

    handle_remove_impl(&remove_args(&["B"], false), dir.path(), &mut prompter).unwrap();

    assert_eq!(on_disk(&dir), vec!["00_A.md", "01_C.md"]);
}

#[test]
fn remove_declined_keeps_section() {
    let dir = project(&["00_A.md", "01_B.md"]);
    let mut prompter = ScriptedPrompter::new(&["n"]);

    handle_remove_impl(&remove_args(&["B"], false), dir.path(), &mut prompter).unwrap();

    assert_eq!(on_disk(&dir), vec!["00_A.md", "01_B.md"]);
}

#[test]
fn remove_with_confirm_flag_does_not_ask() {
    let dir = project(&["00_A.md", "01_B.md"]);
    let mut prompter = ScriptedPrompter::new(&[]);

    handle_remove_impl(&remove_args(&["0"], true), dir.path(), &mut prompter).unwrap();

    assert!(prompter.asked.is_empty());
    assert_eq!(on_disk(&dir), vec!["00_B.md"]);
}

#[test]
fn remove_batch_title_then_index() {
    let dir = project(&["00_A.md", "01_B.md", "02_Intro.md", "03_D.md", "04_E.md"]);
    let mut prompter = ScriptedPrompter::new(&[]);

    handle_remove_impl(&remove_args(&["Intro", "2"], true), dir.path(), &mut prompter).unwrap();

    assert_eq!(on_disk(&dir), vec!["00_A.md", "01_B.md", "02_E.md"]);
}

#[test]
fn remove_batch_indices_use_original_numbering() {
    let dir = project(&["00_A.md", "01_B.md", "02_C.md", "03_D.md", "04_E.md"]);
    let mut prompter = ScriptedPrompter::new(&[]);

    handle_remove_impl(&remove_args(&["1", "3"], true), dir.path(), &mut prompter).unwrap();

    assert_eq!(on_disk(&dir), vec!["00_A.md", "01_C.md", "02_E.md"]);
}

#[test]
fn remove_batch_indices_in_descending_order() {
    let dir = project(&["00_A.md", "01_B.md", "02_C.md", "03_D.md"]);
    let mut prompter = ScriptedPrompter::new(&[]);

    handle_remove_impl(&remove_args(&["3", "1"], true), dir.path(), &mut prompter).unwrap();

    assert_eq!(on_disk(&dir), vec!["00_A.md", "01_C.md"]);
}

#[test]
fn remove_continues_after_unmatched_query_then_fails() {
    let dir = project(&["00_A.md", "01_B.md"]);
    let mut prompter = ScriptedPrompter::new(&[]);

    let result = handle_remove_impl(&remove_args(&["Nope", "A"], true), dir.path(), &mut prompter);

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Nope"));
    assert_eq!(on_disk(&dir), vec!["00_B.md"]);
}

#[test]
fn remove_ambiguous_title_prompts_for_choice() {
    let dir = project(&["00_Notes.md", "01_B.md", "02_Notes.md"]);
    let mut prompter = ScriptedPrompter::new(&["2", "y"]);

    handle_remove_impl(&remove_args(&["notes"], false), dir.path(), &mut prompter).unwrap();

    assert_eq!(on_disk(&dir), vec!["00_Notes.md", "01_B.md"]);
}

#[test]
fn remove_ambiguous_quit_skips_query() {
    let dir = project(&["00_Notes.md", "01_Notes.md"]);
    let mut prompter = ScriptedPrompter::new(&["q"]);

    handle_remove_impl(&remove_args(&["notes"], false), dir.path(), &mut prompter).unwrap();

    assert_eq!(on_disk(&dir), vec!["00_Notes.md", "01_Notes.md"]);
}

#[test]
fn remove_in_empty_project_fails() {
    let dir = project(&[]);
    let result = handle_remove_impl(
        &remove_args(&["A"], true),
        dir.path(),
        &mut ScriptedPrompter::new(&[]),
    );
    assert!(result.is_err());
}

// ===========================================
// move tests
// ===========================================

#[test]
fn move_relocates_section() {
    let dir = project(&["00_A.md", "01_B.md", "02_C.md", "03_D.md", "04_E.md"]);
    let args = MoveArgs {
        section: "E".to_string(),
        to: 1,
    };

    handle_move_impl(&args, dir.path(), &mut ScriptedPrompter::new(&[])).unwrap();

    assert_eq!(
        on_disk(&dir),
        vec!["00_A.md", "01_E.md", "02_B.md", "03_C.md", "04_D.md"]
    );
}

#[test]
fn move_out_of_range_fails_without_changes() {
    let dir = project(&["00_A.md", "01_B.md"]);
    let args = MoveArgs {
        section: "A".to_string(),
        to: 5,
    };

    let result = handle_move_impl(&args, dir.path(), &mut ScriptedPrompter::new(&[]));

    assert!(result.is_err());
    assert_eq!(on_disk(&dir), vec!["00_A.md", "01_B.md"]);
}

#[test]
fn move_unknown_section_fails() {
    let dir = project(&["00_A.md"]);
    let args = MoveArgs {
        section: "Z".to_string(),
        to: 0,
    };

    let err = handle_move_impl(&args, dir.path(), &mut ScriptedPrompter::new(&[])).unwrap_err();
    assert!(err.to_string().contains("'Z'"));
}

// ===========================================
// edit tests
// ===========================================

#[test]
fn edit_opens_matching_section() {
    let dir = project(&["00_A.md", "01_B.md"]);
    let editor = RecordingEditor::default();
    let args = EditArgs {
        section: Some("1".to_string()),
        config: false,
    };

    handle_edit_impl(&args, dir.path(), &editor, &mut ScriptedPrompter::new(&[])).unwrap();

    let opened = editor.opened.borrow();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].ends_with("01_B.md"));
}

#[test]
fn edit_config_opens_doctor_toml() {
    let dir = project(&[]);
    let editor = RecordingEditor::default();
    let args = EditArgs {
        section: None,
        config: true,
    };

    handle_edit_impl(&args, dir.path(), &editor, &mut ScriptedPrompter::new(&[])).unwrap();

    assert_eq!(
        editor.opened.borrow().as_slice(),
        &[ProjectConfig::path(dir.path())]
    );
}

#[test]
fn edit_propagates_editor_failure() {
    let dir = project(&["00_A.md"]);
    let args = EditArgs {
        section: Some("A".to_string()),
        config: false,
    };

    let result = handle_edit_impl(&args, dir.path(), &FailingEditor, &mut ScriptedPrompter::new(&[]));
    assert!(result.is_err());
}

#[test]
fn edit_quit_on_ambiguous_opens_nothing() {
    let dir = project(&["00_Notes.md", "01_Notes.md"]);
    let editor = RecordingEditor::default();
    let args = EditArgs {
        section: Some("Notes".to_string()),
        config: false,
    };

    handle_edit_impl(&args, dir.path(), &editor, &mut ScriptedPrompter::new(&["q"])).unwrap();

    assert!(editor.opened.borrow().is_empty());
}

// ===========================================
// new tests
// ===========================================

#[test]
fn create_document_scaffolds_project() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("thesis");

    let root = create_document(&target, false).unwrap();

    assert_eq!(root, target);
    assert!(root.join("secs").is_dir());
    assert!(root.join("assets").join("references.bib").is_file());
    let config = ProjectConfig::load(&root).unwrap();
    assert_eq!(config.meta.title.as_deref(), Some("Thesis"));
}

#[test]
fn create_document_with_default_sections() {
    let dir = TempDir::new().unwrap();
    let root = create_document(&dir.path().join("report"), true).unwrap();

    let store = SectionStore::open(&root).unwrap();
    let titles: Vec<&str> = store.sections().iter().map(|s| s.title()).collect();
    assert_eq!(titles, DEFAULT_SECTIONS.to_vec());
    assert_eq!(store.sections()[6].index(), 6);
}

#[test]
fn create_document_keeps_existing_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doctor.toml"), "[build]\nfilename = \"mine\"\n").unwrap();

    create_document(dir.path(), false).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("doctor.toml")).unwrap(),
        "[build]\nfilename = \"mine\"\n"
    );
}

#[test]
fn create_document_rejects_file_path() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("taken");
    fs::write(&file, "").unwrap();

    assert!(create_document(&file, false).is_err());
}

// ===========================================
// build plan tests
// ===========================================

#[test]
fn render_plan_lists_sections_in_order() {
    let dir = project(&["01_B.md", "00_A.md"]);
    let store = SectionStore::open(dir.path()).unwrap();
    let config: ProjectConfig = toml::from_str("").unwrap();

    let plan = render_plan(dir.path(), &config, &store);

    assert_eq!(plan.output, dir.path().join("document.pdf"));
    let names: Vec<String> = plan
        .inputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["00_A.md", "01_B.md"]);
    assert_eq!(
        plan.resource_paths,
        vec![
            dir.path().to_path_buf(),
            dir.path().join("assets"),
            dir.path().join("secs"),
        ]
    );
}

#[test]
fn render_plan_uses_bibliography_only_when_present() {
    let dir = project(&["00_A.md"]);
    let store = SectionStore::open(dir.path()).unwrap();
    let config: ProjectConfig = toml::from_str("").unwrap();

    assert!(render_plan(dir.path(), &config, &store).bibliography.is_none());

    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets").join("references.bib"), "").unwrap();
    assert_eq!(
        render_plan(dir.path(), &config, &store).bibliography,
        Some(dir.path().join("assets").join("references.bib"))
    );
}

#[test]
fn render_plan_uses_output_format_as_extension() {
    let dir = project(&["00_A.md"]);
    let store = SectionStore::open(dir.path()).unwrap();
    let config: ProjectConfig =
        toml::from_str("[build]\nfilename = \"paper\"\noutput-format = \"html\"\n").unwrap();

    let plan = render_plan(dir.path(), &config, &store);
    assert_eq!(plan.output, dir.path().join("paper.html"));
}

// ===========================================
// count_words tests
// ===========================================

#[test]
fn count_words_ignores_markup() {
    let text = "# Intro\n\nSome *emphasised* text with a [link](http://example.com).\n";
    assert_eq!(count_words(text), 7);
}

#[test]
fn count_words_separates_blocks() {
    assert_eq!(count_words("# Title\nBody\n\n- one\n- two\n"), 4);
}

#[test]
fn count_words_keeps_inline_markup_inside_word() {
    assert_eq!(count_words("un**believ**able"), 1);
}

#[test]
fn count_words_of_empty_text_is_zero() {
    assert_eq!(count_words(""), 0);
    assert_eq!(count_words("\n\n   \n"), 0);
}
