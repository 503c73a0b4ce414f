//! Integration tests for templar-core.
//!
//! Full-pipeline runs over in-memory documents: parse, expand, inspect the
//! finished tree. The memory loader keeps include scenarios hermetic.

use templar_adapters::MemoryDocumentLoader;
use templar_core::{
    application::ExpandService,
    domain::Node,
    expand::{ExpandOptions, TemplateStrictness, UNBOUNDED_LOOP_CAP},
};

const INPUT: &str = "/proj/main.xml";

fn expand(sources: &[(&str, &str)]) -> Node {
    try_expand(sources).expect("expansion should succeed")
}

fn try_expand(sources: &[(&str, &str)]) -> templar_core::error::TemplarResult<Node> {
    let loader = MemoryDocumentLoader::new();
    for (path, source) in sources {
        loader.insert(*path, *source);
    }
    let service = ExpandService::new(Box::new(loader), ExpandOptions::new("/base"));
    service.expand_file(INPUT)
}

fn tags(node: &Node) -> Vec<&str> {
    node.children.iter().map(|c| c.tag.as_str()).collect()
}

#[test]
fn expansion_is_idempotent_on_plain_markup() {
    let source = "<Root a=\"1\">\n  <Child x=\"y\">text</Child>\n  <Other/>\n</Root>";
    let once = expand(&[(INPUT, source)]);
    // A tree with no macro vocabulary comes back exactly as parsed.
    let parsed = templar_adapters::parse_document(source).unwrap();
    assert_eq!(once, parsed);
}

#[test]
fn condition_true_wrapper_children_in_order() {
    let tree = expand(&[(
        INPUT,
        "<Root><Condition Check=\"UNSET\">\
           <True><A/><B/></True><False><C/></False>\
         </Condition></Root>",
    )]);
    // Check on an unbound name fails, so the False branch splices.
    assert_eq!(tags(&tree), vec!["C"]);
}

#[test]
fn condition_tree_form_with_nested_construct_in_branch() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Condition>\
             <Test><GreaterOrEqual><Number>2</Number><Number>1</Number></GreaterOrEqual></Test>\
             <Condition>\
               <Test><StringEqual><Number>x</Number><Number>x</Number></StringEqual></Test>\
               <Inner/>\
             </Condition>\
           </Condition>\
         </Root>",
    )]);
    // The nested Condition spliced by the outer one expands in the same pass.
    assert_eq!(tags(&tree), vec!["Inner"]);
}

#[test]
fn switch_splices_at_most_one_case() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"Pick\">\
             <Switch Param=\"MODE\">\
               <Case Value=\"a\"><A/></Case>\
               <Case Value=\"b\"><B/></Case>\
               <Default><D/></Default>\
             </Switch>\
           </Template>\
           <UseTemplate Name=\"Pick\"><MODE>b</MODE></UseTemplate>\
           <UseTemplate Name=\"Pick\"><MODE>zzz</MODE></UseTemplate>\
         </Root>",
    )]);
    assert_eq!(tags(&tree), vec!["B", "D"]);
}

#[test]
fn loop_from_zero_to_three_splices_three_bodies() {
    let tree = expand(&[(
        INPUT,
        "<Root><Loop>\
           <Setup><Param>I</Param><From>0</From><Inc>1</Inc><To>3</To></Setup>\
           <Do><Item n=\"#I#\"/></Do>\
         </Loop></Root>",
    )]);
    assert_eq!(tree.children.len(), 3);
    let values: Vec<_> = tree.children.iter().map(|c| c.attr("n").unwrap()).collect();
    assert_eq!(values, vec!["0", "1", "2"]);
}

#[test]
fn loop_without_bounds_caps_at_sixty_four() {
    let tree = expand(&[(
        INPUT,
        "<Root><Loop>\
           <Setup><Param>I</Param><From>0</From></Setup>\
           <Do><Item/></Do>\
         </Loop></Root>",
    )]);
    assert_eq!(tree.children.len(), UNBOUNDED_LOOP_CAP);
}

#[test]
fn call_site_argument_beats_default() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"Gauge\">\
             <DefaultTemplateParameters><Speed>10</Speed></DefaultTemplateParameters>\
             <Out speed=\"#Speed#\"/>\
           </Template>\
           <UseTemplate Name=\"Gauge\"><Speed>20</Speed></UseTemplate>\
           <UseTemplate Name=\"Gauge\"/>\
         </Root>",
    )]);
    let speeds: Vec<_> = tree.children.iter().map(|c| c.attr("speed").unwrap()).collect();
    assert_eq!(speeds, vec!["20", "10"]);
}

#[test]
fn override_beats_call_site_and_default() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"Gauge\">\
             <DefaultTemplateParameters><Speed>10</Speed></DefaultTemplateParameters>\
             <OverrideTemplateParameters><Speed>99</Speed></OverrideTemplateParameters>\
             <Out speed=\"#Speed#\"/>\
           </Template>\
           <UseTemplate Name=\"Gauge\"><Speed>20</Speed></UseTemplate>\
         </Root>",
    )]);
    assert_eq!(tree.children[0].attr("speed"), Some("99"));
}

#[test]
fn override_without_value_unbinds() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"Gauge\">\
             <OverrideTemplateParameters><Speed/></OverrideTemplateParameters>\
             <Condition Check=\"Speed\"><True><Bound/></True><False><Unbound/></False></Condition>\
           </Template>\
           <UseTemplate Name=\"Gauge\"><Speed>20</Speed></UseTemplate>\
         </Root>",
    )]);
    assert_eq!(tags(&tree), vec!["Unbound"]);
}

#[test]
fn defaults_accumulate_in_declaration_order() {
    // The second default's RPN sees the first default's binding.
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"Calc\">\
             <DefaultTemplateParameters>\
               <Base>4</Base>\
               <Twice Process=\"Int\">#Base# 2 *</Twice>\
             </DefaultTemplateParameters>\
             <Out v=\"#Twice#\"/>\
           </Template>\
           <UseTemplate Name=\"Calc\"/>\
         </Root>",
    )]);
    assert_eq!(tree.children[0].attr("v"), Some("8"));
}

#[test]
fn parameters_element_with_type_attribute_is_an_alias() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"T\">\
             <Parameters Type=\"Default\"><P>5</P></Parameters>\
             <Out v=\"#P#\"/>\
           </Template>\
           <UseTemplate Name=\"T\"/>\
         </Root>",
    )]);
    assert_eq!(tree.children[0].attr("v"), Some("5"));
}

#[test]
fn editable_parameters_are_dropped_without_binding() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"T\">\
             <EditableTemplateParameters><P>editor-only</P></EditableTemplateParameters>\
             <Out v=\"#P#\"/>\
           </Template>\
           <UseTemplate Name=\"T\"/>\
         </Root>",
    )]);
    assert_eq!(tree.children[0].attr("v"), Some(""));
}

#[test]
fn conditional_defaults_expand_before_binding() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"T\">\
             <DefaultTemplateParameters>\
               <Condition Check=\"WANT_FAST\">\
                 <True><Speed>200</Speed></True>\
                 <False><Speed>50</Speed></False>\
               </Condition>\
             </DefaultTemplateParameters>\
             <Out speed=\"#Speed#\"/>\
           </Template>\
           <UseTemplate Name=\"T\"><WANT_FAST>1</WANT_FAST></UseTemplate>\
           <UseTemplate Name=\"T\"/>\
         </Root>",
    )]);
    let speeds: Vec<_> = tree.children.iter().map(|c| c.attr("speed").unwrap()).collect();
    assert_eq!(speeds, vec!["200", "50"]);
}

#[test]
fn template_call_with_processed_argument() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"T\"><Out v=\"#N#\"/></Template>\
           <UseTemplate Name=\"T\"><N Process=\"Int\">5 3 +</N></UseTemplate>\
         </Root>",
    )]);
    assert_eq!(tree.children[0].attr("v"), Some("8"));
}

#[test]
fn nested_template_calls_expand_fully() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"Inner\"><Leaf v=\"#X#\"/></Template>\
           <Template Name=\"Outer\"><UseTemplate Name=\"Inner\"><X>#Y#</X></UseTemplate></Template>\
           <UseTemplate Name=\"Outer\"><Y>7</Y></UseTemplate>\
         </Root>",
    )]);
    assert_eq!(tags(&tree), vec!["Leaf"]);
    assert_eq!(tree.children[0].attr("v"), Some("7"));
}

#[test]
fn including_the_same_file_twice_splices_once() {
    let tree = expand(&[
        (
            INPUT,
            "<Root>\
               <Include ModelBehaviorFile=\"common.xml\"/>\
               <Include ModelBehaviorFile=\"COMMON.XML\"/>\
             </Root>",
        ),
        ("/base/common.xml", "<Defs><Shared/></Defs>"),
    ]);
    // Case-insensitive dedup: the second include is a pure no-op, and the
    // upper-case spelling is never even loaded.
    assert_eq!(tags(&tree), vec!["Shared"]);
}

#[test]
fn nested_relative_include_resolves_against_the_including_file() {
    let tree = expand(&[
        (
            INPUT,
            "<Root><Include ModelBehaviorFile=\"sub/common.xml\"/></Root>",
        ),
        (
            "/base/sub/common.xml",
            "<Defs><Include RelativeFile=\"extra.xml\"/></Defs>",
        ),
        ("/base/sub/extra.xml", "<Defs><Extra/></Defs>"),
    ]);
    assert_eq!(tags(&tree), vec!["Extra"]);
}

#[test]
fn templates_defined_in_includes_are_callable_after_the_include() {
    let tree = expand(&[
        (
            INPUT,
            "<Root>\
               <Include ModelBehaviorFile=\"defs.xml\"/>\
               <UseTemplate Name=\"FromInclude\"/>\
             </Root>",
        ),
        (
            "/base/defs.xml",
            "<Defs><Template Name=\"FromInclude\"><Marker/></Template></Defs>",
        ),
    ]);
    assert_eq!(tags(&tree), vec!["Marker"]);
}

#[test]
fn file_markers_never_reach_the_output() {
    let tree = expand(&[
        (INPUT, "<Root><Include ModelBehaviorFile=\"c.xml\"/><After/></Root>"),
        ("/base/c.xml", "<Defs><Shared/></Defs>"),
    ]);
    assert!(tree.children.iter().all(|c| c.tag != "FILE" && c.tag != "EOF"));
    assert_eq!(tags(&tree), vec!["Shared", "After"]);
}

#[test]
fn unbound_placeholder_in_text_expands_to_empty() {
    let tree = expand(&[(INPUT, "<Root><Msg>#FOO#</Msg></Root>")]);
    assert_eq!(tree.children[0].text.as_deref(), Some(""));
}

#[test]
fn definitions_are_removed_from_output() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"T\"><X/></Template>\
           <InputEvent ID=\"EV\"><Y/></InputEvent>\
           <Keep/>\
         </Root>",
    )]);
    assert_eq!(tags(&tree), vec!["Keep"]);
}

#[test]
fn duplicate_template_definition_is_fatal() {
    let result = try_expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"T\"><X/></Template>\
           <Template Name=\"T\"><Y/></Template>\
         </Root>",
    )]);
    assert!(result.is_err());
}

#[test]
fn missing_include_target_is_fatal() {
    let result = try_expand(&[(INPUT, "<Root><Include ModelBehaviorFile=\"ghost.xml\"/></Root>")]);
    assert!(result.is_err());
}

#[test]
fn lenient_strictness_tolerates_undefined_templates() {
    let loader = MemoryDocumentLoader::new()
        .with_document(INPUT, "<Root><UseTemplate Name=\"Ghost\"/><Keep/></Root>");
    let options =
        ExpandOptions::new("/base").with_strictness(TemplateStrictness::Lenient);
    let tree = ExpandService::new(Box::new(loader), options)
        .expand_file(INPUT)
        .unwrap();
    assert_eq!(tags(&tree), vec!["Keep"]);
}

#[test]
fn use_template_inside_loop_sees_the_loop_variable() {
    let tree = expand(&[(
        INPUT,
        "<Root>\
           <Template Name=\"Row\"><Item n=\"#N#\"/></Template>\
           <Loop>\
             <Setup><Param>I</Param><From>0</From><To>2</To></Setup>\
             <Do><UseTemplate Name=\"Row\"><N>#I#</N></UseTemplate></Do>\
           </Loop>\
         </Root>",
    )]);
    let values: Vec<_> = tree.children.iter().map(|c| c.attr("n").unwrap()).collect();
    assert_eq!(values, vec!["0", "1"]);
}
