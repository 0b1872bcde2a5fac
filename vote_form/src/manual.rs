/*!

This is the long-form manual for `vote_form` and `voteform`.

## Form model

A form document is a flat registry of named elements. Two kinds of element
are modeled:

* a _selector_: a single-value selection control. The empty string means
  that nothing is chosen.
* a _region group_: a named cluster of form sections whose visibility is
  driven as a unit.

The canonical layout is the vote change form of the election
administration: one selector (`election`) and two region groups
(`pluralities` and `preferentials`) holding the plurality and preferential
vote sub-forms. The sub-forms are useless without a chosen election, since
the candidate drop-downs are populated from it, so a
[`VisibilityController`](crate::VisibilityController) keeps both groups
visible exactly when the selector holds a non-empty value.

Absent elements are never an error. A controller bound to a selector that
is not in the document does nothing at all, and a bound region group that is
missing is skipped while the remaining groups are still toggled. This
mirrors the degradation of the original form when the expected markup is
missing.

## Scenario input formats

The `voteform` command replays a scenario: the successive values taken by
the election selector. The following providers are supported:

* `json`: a JSON array of steps. A step is either a bare string (the next
  selector value) or an object `{"id": ..., "value": ...}`.
* `csv`: one value per row, in the column given by `valueColumnIndex`
  (1-based, default first column). A header row is expected unless
  `hasHeaderRow` is set to `false`. Use `""` for a row that clears the
  selection.

## Session configuration

A session file describes the form layout and where to read the scenario
from:

```json
{
  "outputSettings": {"sessionName": "weekly_entry"},
  "form": {
    "electionSelector": {"id": "election", "initialValue": ""},
    "regionGroups": [{"id": "pluralities"}, {"id": "preferentials"}]
  },
  "scenarioFileSources": [
    {"provider": "json", "filePath": "steps.json"}
  ]
}
```

Scenario file paths are resolved relative to the directory of the session
file. Multiple sources are replayed in the order they are listed.

## Trace output

The replay produces a JSON trace: one record per processed event (the
initial ready event, then one per change), carrying the selector value and
the display state of every region group. A reference trace can be supplied
with `--reference`; any difference is printed and reported as an error.

*/
