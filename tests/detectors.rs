//! Scenario coverage for the shipped detector battery.

use whiff::config::WhiffConfig;
use whiff::smell::DetectorRegistry;
use whiff::warning::SmellWarning;
use whiff::{ExamineStrategy, Examiner};

fn examine(text: &str) -> Vec<SmellWarning> {
    whiff::examine_source("test.sexp", text).into_smells()
}

fn examine_with(text: &str, layers: &[WhiffConfig]) -> Vec<SmellWarning> {
    let registry = DetectorRegistry::default_detectors();
    Examiner::from_source(
        "test.sexp",
        text,
        layers,
        &registry,
        ExamineStrategy::ActiveSmellsOnly,
    )
    .into_smells()
}

fn by_subclass<'a>(warnings: &'a [SmellWarning], subclass: &str) -> Vec<&'a SmellWarning> {
    warnings
        .iter()
        .filter(|w| w.smell_subclass == subclass)
        .collect()
}

// ----------------------------------------------------------------------
// complexity/long_parameter_list
// ----------------------------------------------------------------------

#[test]
fn long_parameter_list_fires_above_the_default_maximum() {
    let warnings = examine(
        "(def :configure (args (arg :host) (arg :port) (arg :user) (arg :pass)) \
         (send nil :connect (lvar :host) (lvar :port) (lvar :user) (lvar :pass)))",
    );
    let found = by_subclass(&warnings, "long_parameter_list");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "configure");
    assert_eq!(found[0].parameters.get("count"), Some(&toml::Value::Integer(4)));
}

#[test]
fn long_parameter_list_is_quiet_at_the_default_maximum() {
    let warnings = examine(
        "(def :configure (args (arg :host) (arg :port) (arg :user)) \
         (send nil :connect (lvar :host) (lvar :port) (lvar :user)))",
    );
    assert!(by_subclass(&warnings, "long_parameter_list").is_empty());
}

#[test]
fn block_parameters_do_not_count_toward_the_parameter_list() {
    let warnings = examine(
        "(def :each_pair (args (arg :left) (arg :right) (arg :third) (blockarg :visitor)) \
         (send nil :walk (lvar :left) (lvar :right) (lvar :third)))",
    );
    assert!(by_subclass(&warnings, "long_parameter_list").is_empty());
}

// ----------------------------------------------------------------------
// complexity/too_many_methods
// ----------------------------------------------------------------------

const METHOD_NAMES: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi",
];

fn class_with_methods(count: usize) -> String {
    let defs: Vec<String> = METHOD_NAMES[..count]
        .iter()
        .map(|name| format!("(def :{name} (args) (send nil :work))"))
        .collect();
    format!(
        "(class (const nil :Sprawl) nil (begin {}))",
        defs.join(" ")
    )
}

#[test]
fn too_many_methods_counts_instance_methods() {
    let warnings = examine(&class_with_methods(16));
    let found = by_subclass(&warnings, "too_many_methods");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "Sprawl");
    assert_eq!(found[0].message, "has 16 methods");

    let warnings = examine(&class_with_methods(15));
    assert!(by_subclass(&warnings, "too_many_methods").is_empty());
}

#[test]
fn singleton_methods_do_not_count_toward_the_method_tally() {
    let mut defs: Vec<String> = METHOD_NAMES[..15]
        .iter()
        .map(|name| format!("(def :{name} (args) (send nil :work))"))
        .collect();
    defs.push("(defs (self) :build (args) (send nil :work))".to_string());
    let source = format!("(class (const nil :Sprawl) nil (begin {}))", defs.join(" "));
    let warnings = examine(&source);
    assert!(by_subclass(&warnings, "too_many_methods").is_empty());
}

// ----------------------------------------------------------------------
// complexity/nested_iterators
// ----------------------------------------------------------------------

#[test]
fn nested_iterators_reports_the_deepest_nesting() {
    let warnings = examine(
        "(def :walk (args) \
           (block (send (lvar :rows) :each) (args (arg :row)) \
             (block (send (lvar :row) :each) (args (arg :cell)) \
               (send nil :handle (lvar :cell)))))",
    );
    let found = by_subclass(&warnings, "nested_iterators");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "contains iterators nested 2 deep");
    assert_eq!(found[0].parameters.get("depth"), Some(&toml::Value::Integer(2)));
}

#[test]
fn a_single_iterator_is_quiet() {
    let warnings = examine(
        "(def :walk (args) \
           (block (send (lvar :rows) :each) (args (arg :row)) \
             (send nil :handle (lvar :row))))",
    );
    assert!(by_subclass(&warnings, "nested_iterators").is_empty());
}

#[test]
fn ignored_iterators_do_not_deepen_the_nesting() {
    let warnings = examine(
        "(def :tapping (args) \
           (block (send (lvar :widget) :tap) (args (arg :inner)) \
             (block (send (lvar :inner) :each) (args (arg :item)) \
               (send nil :handle (lvar :item)))))",
    );
    assert!(by_subclass(&warnings, "nested_iterators").is_empty());
}

#[test]
fn iterators_in_nested_definitions_belong_to_the_inner_method() {
    let warnings = examine(
        "(def :outer (args) \
           (begin \
             (send nil :prepare) \
             (def :inner (args) \
               (block (send (lvar :rows) :each) (args (arg :row)) \
                 (block (send (lvar :row) :each) (args (arg :cell)) \
                   (send nil :handle (lvar :cell)))))))",
    );
    let found = by_subclass(&warnings, "nested_iterators");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "outer#inner");
}

// ----------------------------------------------------------------------
// control_couple/boolean_parameter
// ----------------------------------------------------------------------

#[test]
fn boolean_defaults_are_reported_per_parameter() {
    let warnings = examine(
        "(def :render (args (arg :text) (optarg :bold (false)) (kwoptarg :wrap (true))) \
         (send nil :draw (lvar :text) (lvar :bold) (lvar :wrap)))",
    );
    let found = by_subclass(&warnings, "boolean_parameter");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].message, "has boolean parameter 'bold'");
    assert_eq!(found[1].message, "has boolean parameter 'wrap'");
}

#[test]
fn non_boolean_defaults_are_quiet() {
    let warnings = examine(
        "(def :render (args (arg :text) (optarg :width (int 80))) \
         (send nil :draw (lvar :text) (lvar :width)))",
    );
    assert!(by_subclass(&warnings, "boolean_parameter").is_empty());
}

// ----------------------------------------------------------------------
// low_cohesion/utility_function
// ----------------------------------------------------------------------

#[test]
fn a_method_without_instance_references_is_a_utility_function() {
    let warnings = examine(
        "(class (const nil :Math) nil (def :add (args (arg :left) (arg :right)) \
         (send (lvar :left) :plus (lvar :right))))",
    );
    let found = by_subclass(&warnings, "utility_function");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "Math#add");
    assert_eq!(found[0].message, "doesn't depend on instance state");
}

#[test]
fn instance_state_access_is_not_a_utility_function() {
    let warnings = examine(
        "(class (const nil :Math) nil (def :total (args) (ivar :@total)))",
    );
    assert!(by_subclass(&warnings, "utility_function").is_empty());
}

#[test]
fn singleton_methods_are_not_utility_functions() {
    let warnings = examine(
        "(class (const nil :Math) nil (defs (self) :add (args (arg :left) (arg :right)) \
         (send (lvar :left) :plus (lvar :right))))",
    );
    assert!(by_subclass(&warnings, "utility_function").is_empty());
}

#[test]
fn public_methods_only_skips_private_methods() {
    let source = "(class (const nil :Math) nil (begin (send nil :private) \
        (def :add (args (arg :left) (arg :right)) (send (lvar :left) :plus (lvar :right)))))";

    let warnings = examine(source);
    assert_eq!(by_subclass(&warnings, "utility_function").len(), 1);

    let restricted: WhiffConfig = toml::from_str(
        r#"
        [detectors.low_cohesion.utility_function]
        public_methods_only = true
        "#,
    )
    .unwrap();
    let warnings = examine_with(source, &[restricted]);
    assert!(by_subclass(&warnings, "utility_function").is_empty());
}

// ----------------------------------------------------------------------
// design/class_variable
// ----------------------------------------------------------------------

#[test]
fn class_variables_are_reported_once_per_name_with_all_lines() {
    let warnings = examine(
        "(class (const nil :Counter) nil (begin\n\
           (cvasgn :@@count (int 0))\n\
           (def :tally (args) (cvar :@@count))))",
    );
    let found = by_subclass(&warnings, "class_variable");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "Counter");
    assert_eq!(found[0].message, "declares the class variable '@@count'");
    assert_eq!(found[0].lines, vec![2, 3]);
}

#[test]
fn class_variables_in_nested_namespaces_belong_to_them() {
    let warnings = examine(
        "(module (const nil :Outer) (class (const nil :Inner) nil (cvasgn :@@seen (int 0))))",
    );
    let found = by_subclass(&warnings, "class_variable");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "Outer::Inner");
}

// ----------------------------------------------------------------------
// design/module_initialize
// ----------------------------------------------------------------------

#[test]
fn a_module_defining_initialize_is_reported() {
    let warnings = examine(
        "(module (const nil :Greeter) (def :initialize (args) (ivasgn :@name (str \"whiff\"))))",
    );
    let found = by_subclass(&warnings, "module_initialize");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "Greeter");

    let class_warnings = examine(
        "(class (const nil :Greeter) nil (def :initialize (args) (ivasgn :@name (str \"whiff\"))))",
    );
    assert!(by_subclass(&class_warnings, "module_initialize").is_empty());
}

// ----------------------------------------------------------------------
// naming
// ----------------------------------------------------------------------

#[test]
fn single_letter_method_names_are_uncommunicative() {
    let warnings = examine("(def :x (args) (send nil :poke))");
    let found = by_subclass(&warnings, "uncommunicative_method_name");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "has the name 'x'");
}

#[test]
fn trailing_digits_in_method_names_are_uncommunicative() {
    let warnings = examine("(def :phase2 (args) (send nil :poke))");
    assert_eq!(by_subclass(&warnings, "uncommunicative_method_name").len(), 1);
}

#[test]
fn accepted_patterns_override_rejection() {
    let accepting: WhiffConfig = toml::from_str(
        r#"
        [detectors.naming.uncommunicative_method_name]
        accept = ["/^x$/"]
        "#,
    )
    .unwrap();
    let warnings = examine_with("(def :x (args) (send nil :poke))", &[accepting]);
    assert!(by_subclass(&warnings, "uncommunicative_method_name").is_empty());
}

#[test]
fn short_parameter_names_are_uncommunicative() {
    let warnings = examine("(def :measure (args (arg :n)) (send nil :emit (lvar :n)))");
    let found = by_subclass(&warnings, "uncommunicative_parameter_name");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "has the parameter name 'n'");
}

#[test]
fn underscore_prefixed_parameters_are_accepted_as_deliberate() {
    let warnings = examine("(def :measure (args (arg :_n)) (send nil :emit))");
    assert!(by_subclass(&warnings, "uncommunicative_parameter_name").is_empty());
}

// ----------------------------------------------------------------------
// unused_code/unused_parameters
// ----------------------------------------------------------------------

#[test]
fn an_unreferenced_parameter_is_reported() {
    let warnings = examine(
        "(def :announce (args (arg :used) (arg :spare)) (send nil :emit (lvar :used)))",
    );
    let found = by_subclass(&warnings, "unused_parameters");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "has unused parameter 'spare'");
}

#[test]
fn parameters_used_inside_blocks_count_as_used() {
    let warnings = examine(
        "(def :fanout (args (arg :payload)) \
           (block (send (lvar :workers) :each) (args (arg :worker)) \
             (send (lvar :worker) :push (lvar :payload))))",
    );
    assert!(by_subclass(&warnings, "unused_parameters").is_empty());
}

#[test]
fn bare_super_forwards_every_parameter() {
    let warnings = examine("(def :forward (args (arg :things)) (zsuper))");
    assert!(by_subclass(&warnings, "unused_parameters").is_empty());
}

#[test]
fn marked_unused_parameters_are_skipped() {
    let warnings = examine("(def :callback (args (arg :_event)) (send nil :noop))");
    assert!(by_subclass(&warnings, "unused_parameters").is_empty());
}

#[test]
fn parameters_shadowed_by_nested_definitions_stay_unused() {
    let warnings = examine(
        "(def :outer (args (arg :payload)) \
           (begin (send nil :prepare) \
             (def :inner (args) (send nil :emit (lvar :payload)))))",
    );
    let found = by_subclass(&warnings, "unused_parameters");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context, "outer");
}
