use rebar::error::RebarError;
use rebar::recipe::{
    create_block_type_template, Author, ObjectDetails, PackageOptions, Scaffolder,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PACKAGE_CONTROLLER: &str = r#"<?php
namespace Concrete\Package\PackageBoilerplate;

/* @section composer */
use Composer\Autoload;
/* @endsection composer */
/* @section service-providers */
use Concrete\Package\PackageBoilerplate\Src\Providers\DemoHelperServiceProvider;
/* @endsection service-providers */

class Controller extends Package
{
    protected $pkgHandle = 'package-boilerplate';
    protected $pkgName = 'Package Boilerplate';
    protected $pkgDescription = 'Start building standards complient concrete5 pacakges from me.';

    public function install()
    {
        $pkg = parent::install();
    }
}
"#;

const PACKAGE_README: &str = "# Package Boilerplate

Start building standards complient concrete5 packages from me.

By Oliver Green <oliver@c5labs.com>
";

const THEME_PAGE_THEME: &str = r#"<?php
namespace Concrete\Theme\ThemeBoilerplate;

class PageTheme extends Theme
{
    protected $pThemeHandle = 'theme-boilerplate';
    protected $pThemeName = 'Theme Boilerplate';
}
"#;

const BLOCK_CONTROLLER: &str = r#"<?php
namespace Application\Block\BlockBoilerplate;

class Controller extends BlockController
{
    protected $btName = 'Block Boilerplate';
    protected $btDescription = 'A block boilerplate to start building from.';
}
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn templates(root: &Path) -> Scaffolder {
    let templates = root.join("templates");
    write(&templates, "package-boilerplate/controller.php", PACKAGE_CONTROLLER);
    write(&templates, "package-boilerplate/README.md", PACKAGE_README);
    write(&templates, "package-boilerplate/src/Helpers/DemoHelper.php", "<?php\n");
    write(
        &templates,
        "package-boilerplate/src/Providers/DemoHelperServiceProvider.php",
        "<?php\n",
    );
    write(&templates, "theme-boilerplate/page_theme.php", THEME_PAGE_THEME);
    write(&templates, "block-boilerplate/controller.php", BLOCK_CONTROLLER);
    Scaffolder::new(templates)
}

fn details(handle: &str, name: &str) -> ObjectDetails {
    ObjectDetails {
        handle: handle.to_string(),
        name: name.to_string(),
        description: "A demo.".to_string(),
        author: Author { name: "Jane Doe".to_string(), email: "jane@example.com".to_string() },
    }
}

#[test_log::test]
fn test_create_package_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let scaffolder = templates(temp_dir.path());
    let output = temp_dir.path().join("packages").join("demo");

    let report = scaffolder
        .create_package(&output, &details("demo", "Demo Package"), &PackageOptions::default())
        .unwrap();

    assert_eq!(
        read(&output, "controller.php"),
        r#"<?php
namespace Concrete\Package\Demo;

class Controller extends Package
{
    protected $pkgHandle = 'demo';
    protected $pkgName = 'Demo Package';
    protected $pkgDescription = 'A demo.';

    public function install()
    {
        $pkg = parent::install();
    }
}
"#
    );
    assert_eq!(
        read(&output, "README.md"),
        "# Demo Package\n\nA demo.\n\nBy Jane Doe <jane@example.com>\n"
    );
    assert!(!output.join("src").exists());
    assert_eq!(report.skipped.len(), 2);
}

#[test]
fn test_create_package_with_options() {
    let temp_dir = TempDir::new().unwrap();
    let scaffolder = templates(temp_dir.path());
    let output = temp_dir.path().join("packages").join("demo");
    let options = PackageOptions {
        uses_composer: true,
        uses_service_providers: true,
        ..Default::default()
    };

    scaffolder.create_package(&output, &details("demo", "Demo"), &options).unwrap();

    let controller = read(&output, "controller.php");
    assert!(controller.contains("\nuse Composer\\Autoload;\n"));
    assert!(controller.contains("use Concrete\\Package\\Demo\\Src\\Providers\\DemoHelperServiceProvider;"));
    assert!(!controller.contains("@section"));
    assert!(!controller.contains("@endsection"));
    assert!(output.join("src/Helpers/DemoHelper.php").exists());
    assert!(output.join("src/Providers/DemoHelperServiceProvider.php").exists());
}

#[test]
fn test_create_packaged_theme() {
    let temp_dir = TempDir::new().unwrap();
    let scaffolder = templates(temp_dir.path());
    let output = temp_dir.path().join("packages").join("fancy_package");

    let scaffold = scaffolder.create_theme(&output, &details("fancy", "Fancy"), true).unwrap();

    assert_eq!(scaffold.object_path, output.join("themes").join("fancy"));
    assert!(scaffold.package.is_some());

    let controller = read(&output, "controller.php");
    assert!(controller.contains(
        "namespace Concrete\\Package\\FancyPackage;\n\nuse Concrete\\Core\\Page\\Theme\\Theme;\n"
    ));
    assert!(controller.contains(
        "$pkg = parent::install();\n\n        $theme = Theme::add('fancy', $pkg);\n"
    ));
    assert!(controller.contains("$pkgHandle = 'fancy_package'"));

    let page_theme = read(&scaffold.object_path, "page_theme.php");
    assert!(page_theme.contains("namespace Concrete\\Package\\FancyPackage\\Theme\\Fancy;"));
    assert!(page_theme.contains("$pThemeHandle = 'fancy'"));
    assert!(page_theme.contains("$pThemeName = 'Fancy'"));
}

#[test]
fn test_create_application_block_type() {
    let temp_dir = TempDir::new().unwrap();
    let scaffolder = templates(temp_dir.path());
    let output = temp_dir.path().join("blocks").join("image_gallery");

    let scaffold = scaffolder
        .create_block_type(&output, &details("image_gallery", "Image Gallery"), false)
        .unwrap();

    assert!(scaffold.package.is_none());
    assert_eq!(scaffold.object_path, output);
    assert_eq!(
        read(&output, "controller.php"),
        r#"<?php
namespace Application\Block\ImageGallery;

class Controller extends BlockController
{
    protected $btName = 'Image Gallery';
    protected $btDescription = 'A demo.';
}
"#
    );
}

#[test]
fn test_create_block_type_template() {
    let temp_dir = TempDir::new().unwrap();
    let block = temp_dir.path().join("blocks").join("content");
    write(&block, "view.php", "<?php echo $content;");
    let template_dir = block.join("templates").join("fancy");

    let target = create_block_type_template(&template_dir, &block).unwrap();

    assert_eq!(target, template_dir.join("view.php"));
    assert_eq!(fs::read_to_string(target).unwrap(), "<?php echo $content;");

    let again = create_block_type_template(&template_dir, &block);
    assert!(matches!(again, Err(RebarError::TemplateError(_))));
}

#[test]
fn test_block_type_template_conflicts_with_single_file_template() {
    let temp_dir = TempDir::new().unwrap();
    let block = temp_dir.path().join("blocks").join("content");
    write(&block, "view.php", "<?php");
    write(&block, "templates/fancy.php", "<?php");

    let result = create_block_type_template(block.join("templates").join("fancy"), &block);
    assert!(matches!(result, Err(RebarError::TemplateError(_))));
}

#[test]
fn test_block_type_template_requires_source_view() {
    let temp_dir = TempDir::new().unwrap();
    let block = temp_dir.path().join("blocks").join("content");
    fs::create_dir_all(&block).unwrap();

    let result = create_block_type_template(block.join("templates").join("fancy"), &block);
    match result {
        Err(RebarError::TemplateError(message)) => assert!(message.contains("does not exist")),
        other => panic!("Expected TemplateError, got {other:?}"),
    }
}
