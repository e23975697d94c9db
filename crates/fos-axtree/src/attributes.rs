//! Attributes
//!
//! States and the typed attribute keys a node can carry, plus the small
//! value enums stored inside integer attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! named_enum {
    ($(#[$meta:meta])* $ty:ident { $($variant:ident => $name:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $ty {
            $($variant,)*
        }

        impl $ty {
            /// Every key, in declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant,)*];

            /// camelCase name used in dumps and change logs
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)*
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

named_enum! {
    /// Boolean node state, stored as a bit set
    State {
        AutofillAvailable => "autofillAvailable",
        Collapsed => "collapsed",
        Default => "default",
        Editable => "editable",
        Expanded => "expanded",
        Focusable => "focusable",
        Horizontal => "horizontal",
        Hovered => "hovered",
        Ignored => "ignored",
        Invisible => "invisible",
        Linked => "linked",
        Multiline => "multiline",
        Multiselectable => "multiselectable",
        Protected => "protected",
        Required => "required",
        RichlyEditable => "richlyEditable",
        Vertical => "vertical",
        Visited => "visited",
    }
}

impl State {
    /// Bit of this state inside a node's state mask
    pub const fn mask(self) -> u32 {
        1 << (self as u32)
    }
}

named_enum! {
    StringAttribute {
        AutoComplete => "autoComplete",
        ChildTreeId => "childTreeId",
        ClassName => "className",
        ContainerLiveRelevant => "containerLiveRelevant",
        ContainerLiveStatus => "containerLiveStatus",
        Description => "description",
        Display => "display",
        FontFamily => "fontFamily",
        HtmlTag => "htmlTag",
        KeyShortcuts => "keyShortcuts",
        Language => "language",
        LiveRelevant => "liveRelevant",
        LiveStatus => "liveStatus",
        Name => "name",
        Placeholder => "placeholder",
        RoleDescription => "roleDescription",
        Tooltip => "tooltip",
        Url => "url",
        Value => "value",
    }
}

named_enum! {
    IntAttribute {
        ActivedescendantId => "activedescendantId",
        AriaCellColumnIndex => "ariaCellColumnIndex",
        AriaCellRowIndex => "ariaCellRowIndex",
        AriaColumnCount => "ariaColumnCount",
        AriaRowCount => "ariaRowCount",
        BackgroundColor => "backgroundColor",
        CheckedState => "checkedState",
        Color => "color",
        ColorValue => "colorValue",
        ErrormessageId => "errormessageId",
        HierarchicalLevel => "hierarchicalLevel",
        InPageLinkTargetId => "inPageLinkTargetId",
        InvalidState => "invalidState",
        MemberOfId => "memberOfId",
        NameFrom => "nameFrom",
        NextFocusId => "nextFocusId",
        NextOnLineId => "nextOnLineId",
        PosInSet => "posInSet",
        PreviousFocusId => "previousFocusId",
        PreviousOnLineId => "previousOnLineId",
        ScrollX => "scrollX",
        ScrollXMax => "scrollXMax",
        ScrollXMin => "scrollXMin",
        ScrollY => "scrollY",
        ScrollYMax => "scrollYMax",
        ScrollYMin => "scrollYMin",
        SetSize => "setSize",
        SortDirection => "sortDirection",
        TableCellColumnIndex => "tableCellColumnIndex",
        TableCellColumnSpan => "tableCellColumnSpan",
        TableCellRowIndex => "tableCellRowIndex",
        TableCellRowSpan => "tableCellRowSpan",
        TableColumnCount => "tableColumnCount",
        TableColumnHeaderId => "tableColumnHeaderId",
        TableColumnIndex => "tableColumnIndex",
        TableHeaderId => "tableHeaderId",
        TableRowCount => "tableRowCount",
        TableRowHeaderId => "tableRowHeaderId",
        TableRowIndex => "tableRowIndex",
        TextDirection => "textDirection",
        TextSelEnd => "textSelEnd",
        TextSelStart => "textSelStart",
    }
}

impl IntAttribute {
    /// Attributes whose value is the id of another node
    pub fn is_node_id_attribute(self) -> bool {
        matches!(
            self,
            Self::ActivedescendantId
                | Self::ErrormessageId
                | Self::InPageLinkTargetId
                | Self::MemberOfId
                | Self::NextFocusId
                | Self::NextOnLineId
                | Self::PreviousFocusId
                | Self::PreviousOnLineId
                | Self::TableColumnHeaderId
                | Self::TableHeaderId
                | Self::TableRowHeaderId
        )
    }
}

named_enum! {
    FloatAttribute {
        FontSize => "fontSize",
        FontWeight => "fontWeight",
        MaxValueForRange => "maxValueForRange",
        MinValueForRange => "minValueForRange",
        StepValueForRange => "stepValueForRange",
        TextIndent => "textIndent",
        ValueForRange => "valueForRange",
    }
}

named_enum! {
    BoolAttribute {
        Busy => "busy",
        CanvasHasFallback => "canvasHasFallback",
        ClipsChildren => "clipsChildren",
        ContainerLiveAtomic => "containerLiveAtomic",
        ContainerLiveBusy => "containerLiveBusy",
        EditableRoot => "editableRoot",
        Grabbed => "grabbed",
        HasAriaAttribute => "hasAriaAttribute",
        IsLineBreakingObject => "isLineBreakingObject",
        IsPageBreakingObject => "isPageBreakingObject",
        LiveAtomic => "liveAtomic",
        Modal => "modal",
        Scrollable => "scrollable",
        Selected => "selected",
        SupportsTextLocation => "supportsTextLocation",
        UpdateLocationOnly => "updateLocationOnly",
    }
}

named_enum! {
    IntListAttribute {
        CachedLineStarts => "cachedLineStarts",
        CharacterOffsets => "characterOffsets",
        ControlsIds => "controlsIds",
        CustomActionIds => "customActionIds",
        DescribedbyIds => "describedbyIds",
        DetailsIds => "detailsIds",
        FlowtoIds => "flowtoIds",
        IndirectChildIds => "indirectChildIds",
        LabelledbyIds => "labelledbyIds",
        MarkerEnds => "markerEnds",
        MarkerStarts => "markerStarts",
        MarkerTypes => "markerTypes",
        RadioGroupIds => "radioGroupIds",
        WordEnds => "wordEnds",
        WordStarts => "wordStarts",
    }
}

impl IntListAttribute {
    /// Attributes whose values are ids of other nodes
    pub fn is_node_id_attribute(self) -> bool {
        matches!(
            self,
            Self::ControlsIds
                | Self::DescribedbyIds
                | Self::DetailsIds
                | Self::FlowtoIds
                | Self::IndirectChildIds
                | Self::LabelledbyIds
                | Self::RadioGroupIds
        )
    }
}

/// Value of [`IntAttribute::CheckedState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CheckedState {
    #[default]
    None = 0,
    False = 1,
    True = 2,
    Mixed = 3,
}

impl CheckedState {
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::False,
            2 => Self::True,
            3 => Self::Mixed,
            _ => Self::None,
        }
    }
}

/// Value of [`IntAttribute::TextDirection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDirection {
    #[default]
    None = 0,
    Ltr = 1,
    Rtl = 2,
    Ttb = 3,
    Btt = 4,
}

impl TextDirection {
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Ltr,
            2 => Self::Rtl,
            3 => Self::Ttb,
            4 => Self::Btt,
            _ => Self::None,
        }
    }
}

/// Value of [`IntAttribute::SortDirection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Unsorted = 0,
    Ascending = 1,
    Descending = 2,
    Other = 3,
}

impl SortDirection {
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Ascending,
            2 => Self::Descending,
            3 => Self::Other,
            _ => Self::Unsorted,
        }
    }
}
