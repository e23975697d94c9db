//! Roles
//!
//! Semantic node roles, their debug names, ARIA token mapping and the pure
//! classification functions the tree engine keys its behaviour on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! roles {
    ($($variant:ident => $name:literal,)*) => {
        /// Semantic type of an accessible node
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum Role {
            #[default]
            $($variant,)*
        }

        impl Role {
            /// Every role, in declaration order
            pub const ALL: &'static [Role] = &[$(Role::$variant,)*];

            /// Stable camelCase name used in dumps and change logs
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Role::$variant => $name,)*
                }
            }
        }

        impl FromStr for Role {
            type Err = UnknownRole;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Role::$variant),)*
                    _ => Err(UnknownRole(s.to_string())),
                }
            }
        }
    };
}

roles! {
    Unknown => "unknown",
    Alert => "alert",
    AlertDialog => "alertDialog",
    Application => "application",
    Article => "article",
    Banner => "banner",
    Button => "button",
    Caption => "caption",
    Cell => "cell",
    CheckBox => "checkBox",
    Column => "column",
    ColumnHeader => "columnHeader",
    ComboBoxGrid => "comboBoxGrid",
    ComboBoxMenuButton => "comboBoxMenuButton",
    Complementary => "complementary",
    ContentInfo => "contentInfo",
    Definition => "definition",
    DescriptionList => "descriptionList",
    DescriptionListDetail => "descriptionListDetail",
    DescriptionListTerm => "descriptionListTerm",
    Dialog => "dialog",
    Document => "document",
    Feed => "feed",
    Figure => "figure",
    Form => "form",
    GenericContainer => "genericContainer",
    Grid => "grid",
    Group => "group",
    Heading => "heading",
    Ignored => "ignored",
    Image => "image",
    InlineTextBox => "inlineTextBox",
    LineBreak => "lineBreak",
    Link => "link",
    List => "list",
    ListBox => "listBox",
    ListBoxOption => "listBoxOption",
    ListItem => "listItem",
    ListMarker => "listMarker",
    Log => "log",
    Main => "main",
    Marquee => "marquee",
    Math => "math",
    Menu => "menu",
    MenuBar => "menuBar",
    MenuItem => "menuItem",
    MenuItemCheckBox => "menuItemCheckBox",
    MenuItemRadio => "menuItemRadio",
    MenuListOption => "menuListOption",
    MenuListPopup => "menuListPopup",
    Meter => "meter",
    Navigation => "navigation",
    None => "none",
    Note => "note",
    Paragraph => "paragraph",
    PopUpButton => "popUpButton",
    Presentational => "presentational",
    ProgressIndicator => "progressIndicator",
    RadioButton => "radioButton",
    RadioGroup => "radioGroup",
    Region => "region",
    RootWebArea => "rootWebArea",
    Row => "row",
    RowGroup => "rowGroup",
    RowHeader => "rowHeader",
    ScrollBar => "scrollBar",
    Search => "search",
    SearchBox => "searchBox",
    Separator => "separator",
    Slider => "slider",
    SpinButton => "spinButton",
    Splitter => "splitter",
    StaticText => "staticText",
    Status => "status",
    Switch => "switch",
    Tab => "tab",
    Table => "table",
    TabList => "tabList",
    TabPanel => "tabPanel",
    Term => "term",
    TextField => "textField",
    TextFieldWithComboBox => "textFieldWithComboBox",
    Timer => "timer",
    Toolbar => "toolbar",
    Tooltip => "tooltip",
    Tree => "tree",
    TreeGrid => "treeGrid",
    TreeItem => "treeItem",
    WebArea => "webArea",
}

/// Error returned when parsing an unrecognised role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role name: {0}")]
pub struct UnknownRole(pub String);

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compatibility class of an ordered-set item.
///
/// Items of the same class are counted together inside one ordered set, so
/// the three menu item flavours share a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetItemClass {
    Article,
    DescriptionListTerm,
    ListBoxOption,
    ListItem,
    MenuItem,
    MenuListOption,
    MenuListPopup,
    RadioButton,
    Tab,
    TreeItem,
}

impl Role {
    /// Map an ARIA `role` token onto a role
    pub fn from_aria(token: &str) -> Option<Self> {
        Some(match token.trim().to_ascii_lowercase().as_str() {
            "alert" => Self::Alert,
            "alertdialog" => Self::AlertDialog,
            "application" => Self::Application,
            "article" => Self::Article,
            "banner" => Self::Banner,
            "button" => Self::Button,
            "cell" | "gridcell" => Self::Cell,
            "checkbox" => Self::CheckBox,
            "columnheader" => Self::ColumnHeader,
            "complementary" => Self::Complementary,
            "contentinfo" => Self::ContentInfo,
            "definition" => Self::Definition,
            "dialog" => Self::Dialog,
            "document" => Self::Document,
            "feed" => Self::Feed,
            "figure" => Self::Figure,
            "form" => Self::Form,
            "generic" => Self::GenericContainer,
            "grid" => Self::Grid,
            "group" => Self::Group,
            "heading" => Self::Heading,
            "img" => Self::Image,
            "link" => Self::Link,
            "list" => Self::List,
            "listbox" => Self::ListBox,
            "listitem" => Self::ListItem,
            "log" => Self::Log,
            "main" => Self::Main,
            "marquee" => Self::Marquee,
            "math" => Self::Math,
            "menu" => Self::Menu,
            "menubar" => Self::MenuBar,
            "menuitem" => Self::MenuItem,
            "menuitemcheckbox" => Self::MenuItemCheckBox,
            "menuitemradio" => Self::MenuItemRadio,
            "meter" => Self::Meter,
            "navigation" => Self::Navigation,
            "none" | "presentation" => Self::None,
            "note" => Self::Note,
            "option" => Self::ListBoxOption,
            "paragraph" => Self::Paragraph,
            "progressbar" => Self::ProgressIndicator,
            "radio" => Self::RadioButton,
            "radiogroup" => Self::RadioGroup,
            "region" => Self::Region,
            "row" => Self::Row,
            "rowgroup" => Self::RowGroup,
            "rowheader" => Self::RowHeader,
            "scrollbar" => Self::ScrollBar,
            "search" => Self::Search,
            "searchbox" => Self::SearchBox,
            "separator" => Self::Separator,
            "slider" => Self::Slider,
            "spinbutton" => Self::SpinButton,
            "status" => Self::Status,
            "switch" => Self::Switch,
            "tab" => Self::Tab,
            "table" => Self::Table,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "term" => Self::Term,
            "textbox" => Self::TextField,
            "timer" => Self::Timer,
            "toolbar" => Self::Toolbar,
            "tooltip" => Self::Tooltip,
            "tree" => Self::Tree,
            "treegrid" => Self::TreeGrid,
            "treeitem" => Self::TreeItem,
            _ => return None,
        })
    }

    /// Containers whose items get a position and a set size
    pub fn is_ordered_set(self) -> bool {
        matches!(
            self,
            Self::DescriptionList
                | Self::Feed
                | Self::Group
                | Self::List
                | Self::ListBox
                | Self::Menu
                | Self::MenuBar
                | Self::MenuListPopup
                | Self::PopUpButton
                | Self::RadioGroup
                | Self::TabList
                | Self::Tree
        )
    }

    /// Compatibility class when this role appears as an ordered-set item
    pub fn set_item_class(self) -> Option<SetItemClass> {
        Some(match self {
            Self::Article => SetItemClass::Article,
            Self::DescriptionListTerm => SetItemClass::DescriptionListTerm,
            Self::ListBoxOption => SetItemClass::ListBoxOption,
            Self::ListItem => SetItemClass::ListItem,
            Self::MenuItem | Self::MenuItemCheckBox | Self::MenuItemRadio => {
                SetItemClass::MenuItem
            }
            Self::MenuListOption => SetItemClass::MenuListOption,
            Self::MenuListPopup => SetItemClass::MenuListPopup,
            Self::RadioButton => SetItemClass::RadioButton,
            Self::Tab => SetItemClass::Tab,
            Self::TreeItem => SetItemClass::TreeItem,
            _ => return None,
        })
    }

    /// Item classes an ordered set of this role counts
    pub fn accepted_item_classes(self) -> &'static [SetItemClass] {
        use SetItemClass as C;
        match self {
            Self::DescriptionList => &[C::DescriptionListTerm],
            Self::Feed => &[C::Article],
            Self::Group => &[C::ListItem, C::MenuItem, C::TreeItem],
            Self::List => &[C::ListItem],
            Self::ListBox => &[C::ListBoxOption],
            Self::Menu | Self::MenuBar => &[C::MenuItem],
            Self::MenuListPopup => &[C::MenuListOption],
            Self::PopUpButton => &[C::MenuListPopup],
            Self::RadioGroup => &[C::RadioButton],
            Self::TabList => &[C::Tab],
            Self::Tree => &[C::TreeItem],
            _ => &[],
        }
    }

    /// Whether an ordered set with this role counts items of `item` role
    pub fn ordered_set_accepts(self, item: Role) -> bool {
        item.set_item_class()
            .is_some_and(|class| self.accepted_item_classes().contains(&class))
    }

    pub fn is_generic_container(self) -> bool {
        self == Self::GenericContainer
    }

    /// Text leaves: static text, its inline boxes and line breaks
    pub fn is_text(self) -> bool {
        matches!(self, Self::StaticText | Self::InlineTextBox | Self::LineBreak)
    }

    pub fn is_text_field(self) -> bool {
        matches!(
            self,
            Self::TextField | Self::TextFieldWithComboBox | Self::SearchBox
        )
    }

    pub fn is_table_like(self) -> bool {
        matches!(self, Self::Table | Self::Grid | Self::TreeGrid)
    }

    pub fn is_table_row(self) -> bool {
        self == Self::Row
    }

    pub fn is_cell_or_table_header(self) -> bool {
        matches!(self, Self::Cell | Self::ColumnHeader | Self::RowHeader)
    }

    /// Roles whose children are presentational and hidden from platforms
    pub fn has_presentational_children(self) -> bool {
        matches!(
            self,
            Self::Image
                | Self::Meter
                | Self::ScrollBar
                | Self::Slider
                | Self::Splitter
                | Self::ProgressIndicator
        )
    }

    pub fn is_document(self) -> bool {
        matches!(self, Self::RootWebArea | Self::WebArea | Self::Document)
    }

    pub fn is_container_with_selectable_children(self) -> bool {
        matches!(
            self,
            Self::ComboBoxGrid
                | Self::Grid
                | Self::ListBox
                | Self::Menu
                | Self::MenuBar
                | Self::RadioGroup
                | Self::TabList
                | Self::Tree
                | Self::TreeGrid
        )
    }

    /// Check if role is landmark
    pub fn is_landmark(self) -> bool {
        matches!(
            self,
            Self::Banner
                | Self::Complementary
                | Self::ContentInfo
                | Self::Form
                | Self::Main
                | Self::Navigation
                | Self::Region
                | Self::Search
        )
    }

    /// Roles that carry an implicit live region
    pub fn is_live_region(self) -> bool {
        matches!(
            self,
            Self::Alert | Self::Log | Self::Marquee | Self::Status | Self::Timer
        )
    }
}
